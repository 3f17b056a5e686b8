//! o2 - promote draft notes of an Obsidian-style vault into a published form.
//!
//! # Overview
//!
//! A promotion copies every note under the draft directory into the
//! published directory, strips `[[wiki links]]` from the copies, prefixes
//! names with an ISO date stamp and hands the result to a site-generator
//! adapter. The building blocks are usable on their own:
//! - [`parser::normalize_links`] rewrites `[[Target]]` to `Target`
//! - [`relocate::relocate`] copies or moves a document by path-prefix rewrite
//! - [`rename::rename_batch`] date-stamps a batch of documents
//! - [`pipeline::Promoter`] runs the whole promotion
//!
//! All I/O goes through the [`Storage`] trait, implemented by [`Vault`] for
//! directories on disk and by [`MemoryStorage`] for dry runs.
//!
//! # Example
//!
//! ```no_run
//! use o2::{Config, NoopAdapter, Promoter, PromoteSettings, Vault};
//!
//! let config = Config::default();
//! let vault = Vault::new("/path/to/vault").unwrap();
//! let settings = PromoteSettings::from_config(&config, chrono::Local::now().date_naive());
//!
//! let report = Promoter::new(&vault, &NoopAdapter, settings).promote().unwrap();
//! println!("{}", report.summary());
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod relocate;
pub mod rename;
pub mod report;
pub mod storage;
pub mod vault;

// Re-export main types at crate root
pub use adapter::{NoopAdapter, SiteAdapter};
pub use config::Config;
pub use document::Document;
pub use error::{O2Error, Result};
pub use pipeline::{PromoteSettings, Promoter, PromotionReport, RenameTarget};
pub use relocate::{PathRewriteRule, RelocateMode};
pub use rename::{RenameRule, SpacePolicy};
pub use storage::{MemoryStorage, Storage};
pub use vault::Vault;
