//! Parsers for Obsidian markdown syntax.

pub mod wikilink;

pub use wikilink::{count_links, normalize_links};
