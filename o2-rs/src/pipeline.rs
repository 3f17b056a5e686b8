//! The draft-to-published promotion pipeline.
//!
//! A run copies every document under the draft directory into the published
//! directory, optionally strips wiki links from the copies, stamps either the
//! copies or the drafts with a date, and hands the stamped documents to a
//! [`SiteAdapter`].
//!
//! Per-document work is a joined parallel fan-out. A failing document is
//! recorded in the [`PromotionReport`] and never stops the rest of the batch.
//! Nothing is rolled back. Documents that already have a published copy are
//! skipped, so rerunning a promotion only picks up new drafts.

use crate::adapter::SiteAdapter;
use crate::config::Config;
use crate::document::Document;
use crate::error::{O2Error, Result};
use crate::relocate::{PathRewriteRule, RelocateMode, relocate};
use crate::rename::{RenameRule, rename_batch, unstamped_path};
use crate::report::{DocumentFailure, Stage, summarize};
use crate::storage::Storage;
use chrono::NaiveDate;
use clap::ValueEnum;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Which side of a promotion receives the date stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RenameTarget {
    /// Stamp the published copies; drafts keep their names.
    #[default]
    Published,
    /// Stamp the draft originals; published copies keep the plain name.
    Draft,
}

/// Settings of one promotion run.
#[derive(Debug, Clone)]
pub struct PromoteSettings {
    pub draft_dir: String,
    pub published_dir: String,
    pub rename_rule: RenameRule,
    pub rename_target: RenameTarget,
    pub normalize_links: bool,
}

impl PromoteSettings {
    pub fn from_config(config: &Config, stamp: NaiveDate) -> Self {
        Self {
            draft_dir: config.draft_dir.clone(),
            published_dir: config.published_dir.clone(),
            rename_rule: RenameRule::new(stamp, config.rename.space_policy)
                .with_restamp(config.rename.restamp),
            rename_target: config.rename.target,
            normalize_links: config.promote.normalize_links,
        }
    }
}

/// A draft that made it all the way through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Promoted {
    /// Draft path when the run started.
    pub draft: PathBuf,
    /// Path the copy was created at.
    pub published: PathBuf,
    /// Final path of the stamped document (the copy or the draft).
    pub renamed: PathBuf,
}

/// A draft left alone because it was promoted before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub path: PathBuf,
    pub existing: PathBuf,
}

/// Everything a promotion run did.
#[derive(Debug, Serialize)]
pub struct PromotionReport {
    pub stamp: String,
    pub total: usize,
    pub promoted: Vec<Promoted>,
    pub skipped: Vec<Skipped>,
    pub failed: Vec<DocumentFailure>,
}

impl PromotionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// e.g. `"7 of 9 promoted; 2 failed: <reasons>"`.
    pub fn summary(&self) -> String {
        summarize(
            self.promoted.len(),
            self.total,
            "promoted",
            Some(self.skipped.len()),
            &self.failed,
        )
    }
}

enum CopyOutcome {
    Copied { draft: Document, published: Document },
    Skipped(Skipped),
    Failed(DocumentFailure),
}

/// Runs promotions against a storage provider.
pub struct Promoter<'a> {
    storage: &'a dyn Storage,
    adapter: &'a dyn SiteAdapter,
    settings: PromoteSettings,
}

impl<'a> Promoter<'a> {
    pub fn new(
        storage: &'a dyn Storage,
        adapter: &'a dyn SiteAdapter,
        settings: PromoteSettings,
    ) -> Self {
        Self {
            storage,
            adapter,
            settings,
        }
    }

    /// Promote every document under the draft directory.
    ///
    /// Per-document failures end up in the report. The only errors returned
    /// are listing failures and an adapter rejection, which is passed
    /// through unchanged.
    pub fn promote(&self) -> Result<PromotionReport> {
        let settings = &self.settings;
        let rule = PathRewriteRule::new(&settings.draft_dir, &settings.published_dir);

        let drafts = self.storage.list_under(Path::new(&settings.draft_dir))?;
        let published = self.published_index()?;
        info!(
            drafts = drafts.len(),
            published = published.len(),
            stamp = %settings.rename_rule.stamp_str(),
            "promotion started"
        );

        let outcomes: Vec<CopyOutcome> = drafts
            .par_iter()
            .map(|path| self.copy_one(path, &rule, &published))
            .collect();

        let mut copied = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                CopyOutcome::Copied { draft, published } => copied.push((draft, published)),
                CopyOutcome::Skipped(skip) => skipped.push(skip),
                CopyOutcome::Failed(failure) => failed.push(failure),
            }
        }

        let to_rename: Vec<Document> = copied
            .iter()
            .map(|(draft, published)| match settings.rename_target {
                RenameTarget::Published => published.clone(),
                RenameTarget::Draft => draft.clone(),
            })
            .collect();
        let renamed = rename_batch(self.storage, to_rename, &settings.rename_rule);

        let mut promoted = Vec::new();
        let mut finished = Vec::new();
        for ((draft, published), outcome) in copied.into_iter().zip(renamed) {
            match outcome.result {
                Ok(doc) => {
                    promoted.push(Promoted {
                        draft: draft.path,
                        published: published.path,
                        renamed: doc.path.clone(),
                    });
                    finished.push(doc);
                }
                Err(e) => {
                    warn!(path = %outcome.from.display(), error = %e, "rename failed");
                    failed.push(DocumentFailure::new(&outcome.from, Stage::Rename, &e));
                }
            }
        }

        if finished.is_empty() {
            debug!("nothing to hand to the site adapter");
        } else {
            self.adapter.publish(&finished)?;
        }

        let report = PromotionReport {
            stamp: settings.rename_rule.stamp_str(),
            total: drafts.len(),
            promoted,
            skipped,
            failed,
        };
        info!("{}", report.summary());
        Ok(report)
    }

    /// Published documents that earlier runs produced, keyed by
    /// [`Self::promotion_key`].
    ///
    /// With the published target only stamped copies count; an unstamped file
    /// in the published directory was put there by someone else.
    fn published_index(&self) -> Result<HashMap<PathBuf, PathBuf>> {
        let stamped_only = self.settings.rename_target == RenameTarget::Published;
        Ok(self
            .storage
            .list_under(Path::new(&self.settings.published_dir))?
            .into_iter()
            .filter(|path| !stamped_only || unstamped_path(path) != *path)
            .map(|path| (self.promotion_key(&path), path))
            .collect())
    }

    /// The published path with any date stamp removed and the space policy
    /// applied, so `My Note.md`, `My-Note.md` and `2024-03-02-My-Note.md`
    /// share one key.
    fn promotion_key(&self, published_path: &Path) -> PathBuf {
        let plain = unstamped_path(published_path);
        let renamed = self
            .settings
            .rename_rule
            .rename_path(&plain)
            .unwrap_or_else(|| plain.clone());
        unstamped_path(&renamed)
    }

    /// Find the copy an earlier run made of this draft.
    fn previous_copy<'i>(
        &self,
        draft: &Path,
        published_path: &Path,
        index: &'i HashMap<PathBuf, PathBuf>,
    ) -> Option<&'i PathBuf> {
        // Promoted drafts carry the stamp; an unstamped draft is new
        if self.settings.rename_target == RenameTarget::Draft && unstamped_path(draft) == draft {
            return None;
        }
        index.get(&self.promotion_key(published_path))
    }

    fn copy_one(
        &self,
        path: &Path,
        rule: &PathRewriteRule,
        published: &HashMap<PathBuf, PathBuf>,
    ) -> CopyOutcome {
        let fail = |stage: Stage, e: O2Error| {
            warn!(path = %path.display(), ?stage, error = %e, "promotion failed");
            CopyOutcome::Failed(DocumentFailure::new(path, stage, &e))
        };

        let published_path = match rule.apply(path) {
            Ok(p) => p,
            Err(e) => return fail(Stage::Copy, e),
        };

        if let Some(existing) = self.previous_copy(path, &published_path, published) {
            debug!(path = %path.display(), existing = %existing.display(), "already promoted");
            return CopyOutcome::Skipped(Skipped {
                path: path.to_path_buf(),
                existing: existing.clone(),
            });
        }

        let draft = match self.storage.load(path) {
            Ok(doc) => doc,
            Err(e) => return fail(Stage::Load, e),
        };

        let mut copy = match relocate(self.storage, &draft, rule, RelocateMode::Copy) {
            Ok(doc) => doc,
            Err(e) => return fail(Stage::Copy, e),
        };

        if self.settings.normalize_links && copy.link_count() > 0 {
            copy = copy.with_normalized_links();
            if let Err(e) = self.storage.write(&copy.path, &copy.content) {
                return fail(Stage::Normalize, e);
            }
        }

        CopyOutcome::Copied {
            draft,
            published: copy,
        }
    }
}
