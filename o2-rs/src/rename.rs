//! Date-stamped renaming of document batches.

use crate::document::Document;
use crate::error::Result;
use crate::storage::Storage;
use chrono::{Local, NaiveDate};
use clap::ValueEnum;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

static DATE_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-").unwrap());

/// How spaces are turned into hyphens when a document is stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SpacePolicy {
    /// Every space in the new file name; directories untouched.
    #[default]
    AllInName,
    /// Only the first space anywhere in the resulting path.
    FirstInPath,
    /// Keep spaces.
    Preserve,
}

/// The stamp and options applied to one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    pub stamp: NaiveDate,
    pub space_policy: SpacePolicy,
    /// Stamp names that already carry a date prefix.
    pub restamp: bool,
}

impl RenameRule {
    pub fn new(stamp: NaiveDate, space_policy: SpacePolicy) -> Self {
        Self {
            stamp,
            space_policy,
            restamp: false,
        }
    }

    /// Rule stamped with today's local calendar date.
    pub fn today(space_policy: SpacePolicy) -> Self {
        Self::new(Local::now().date_naive(), space_policy)
    }

    pub fn with_restamp(mut self, restamp: bool) -> Self {
        self.restamp = restamp;
        self
    }

    /// The stamp in ISO 8601 form, e.g. `2024-03-02`.
    pub fn stamp_str(&self) -> String {
        self.stamp.format("%Y-%m-%d").to_string()
    }

    /// Compute the stamped path, or `None` when the name is already stamped
    /// and `restamp` is off.
    pub fn rename_path(&self, path: &Path) -> Option<PathBuf> {
        let name = path.file_name()?.to_string_lossy();
        if !self.restamp && is_stamped(&name) {
            return None;
        }

        let new_name = format!("{}-{}", self.stamp_str(), name);
        let parent = path.parent().unwrap_or(Path::new(""));

        let new_path = match self.space_policy {
            SpacePolicy::AllInName => parent.join(new_name.replace(' ', "-")),
            SpacePolicy::FirstInPath => {
                let joined = parent.join(new_name);
                PathBuf::from(joined.to_string_lossy().replacen(' ', "-", 1))
            }
            SpacePolicy::Preserve => parent.join(new_name),
        };
        Some(new_path)
    }
}

/// Check whether a file name starts with a valid `YYYY-MM-DD-` stamp.
pub fn is_stamped(name: &str) -> bool {
    DATE_STAMP
        .captures(name)
        .and_then(|cap| cap.get(1))
        .map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").is_ok())
        .unwrap_or(false)
}

/// Remove a leading date stamp from the file name of `path`.
pub fn unstamped_path(path: &Path) -> PathBuf {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return path.to_path_buf();
    };
    if !is_stamped(&name) {
        return path.to_path_buf();
    }
    // "YYYY-MM-DD-" is 11 ASCII bytes
    let rest = &name[11..];
    path.with_file_name(rest)
}

/// Result of renaming one document.
#[derive(Debug)]
pub struct RenameOutcome {
    /// Path before the rename.
    pub from: PathBuf,
    /// The document at its final path, or why the rename failed.
    pub result: Result<Document>,
}

impl RenameOutcome {
    /// True when the document kept its path because it was already stamped.
    pub fn is_unchanged(&self) -> bool {
        matches!(&self.result, Ok(doc) if doc.path == self.from)
    }
}

/// Rename every document in `docs` using one shared stamp.
///
/// Documents are renamed in parallel; the call returns once all of them have
/// finished, with one outcome per input document in input order.
pub fn rename_batch<S: Storage + ?Sized>(
    storage: &S,
    docs: Vec<Document>,
    rule: &RenameRule,
) -> Vec<RenameOutcome> {
    info!(count = docs.len(), stamp = %rule.stamp_str(), "renaming batch");

    docs.into_par_iter()
        .map(|doc| {
            let from = doc.path.clone();
            let result = rename_one(storage, doc, rule);
            RenameOutcome { from, result }
        })
        .collect()
}

fn rename_one<S: Storage + ?Sized>(
    storage: &S,
    doc: Document,
    rule: &RenameRule,
) -> Result<Document> {
    let Some(new_path) = rule.rename_path(&doc.path) else {
        debug!(path = %doc.path.display(), "already stamped");
        return Ok(doc);
    };

    storage.rename(&doc.path, &new_path)?;
    debug!(from = %doc.path.display(), to = %new_path.display(), "stamped");

    Ok(Document {
        path: new_path,
        content: doc.content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::O2Error;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
    }

    #[test]
    fn test_all_in_name_hyphenates_file_name() {
        let rule = RenameRule::new(date(), SpacePolicy::AllInName);
        assert_eq!(
            rule.rename_path(Path::new("published/My Note.md")),
            Some(PathBuf::from("published/2024-03-02-My-Note.md"))
        );
        assert_eq!(
            rule.rename_path(Path::new("my drafts/a b c.md")),
            Some(PathBuf::from("my drafts/2024-03-02-a-b-c.md"))
        );
    }

    #[test]
    fn test_first_in_path_replaces_single_space() {
        let rule = RenameRule::new(date(), SpacePolicy::FirstInPath);
        assert_eq!(
            rule.rename_path(Path::new("published/My Note.md")),
            Some(PathBuf::from("published/2024-03-02-My-Note.md"))
        );
        assert_eq!(
            rule.rename_path(Path::new("published/a b c.md")),
            Some(PathBuf::from("published/2024-03-02-a-b c.md"))
        );
        // The first space may sit in a directory name
        assert_eq!(
            rule.rename_path(Path::new("my drafts/a b.md")),
            Some(PathBuf::from("my-drafts/2024-03-02-a b.md"))
        );
    }

    #[test]
    fn test_preserve_keeps_spaces() {
        let rule = RenameRule::new(date(), SpacePolicy::Preserve);
        assert_eq!(
            rule.rename_path(Path::new("My Note.md")),
            Some(PathBuf::from("2024-03-02-My Note.md"))
        );
    }

    #[test]
    fn test_already_stamped_is_left_alone() {
        let rule = RenameRule::new(date(), SpacePolicy::AllInName);
        assert_eq!(rule.rename_path(Path::new("p/2023-12-31-Note.md")), None);

        let restamp = rule.with_restamp(true);
        assert_eq!(
            restamp.rename_path(Path::new("p/2023-12-31-Note.md")),
            Some(PathBuf::from("p/2024-03-02-2023-12-31-Note.md"))
        );
    }

    #[test]
    fn test_is_stamped_requires_real_date() {
        assert!(is_stamped("2024-03-02-x.md"));
        assert!(!is_stamped("2024-13-40-x.md"));
        assert!(!is_stamped("2024-03-02.md"));
        assert!(!is_stamped("x-2024-03-02-y.md"));
    }

    #[test]
    fn test_unstamped_path() {
        assert_eq!(
            unstamped_path(Path::new("p/2024-03-02-My-Note.md")),
            PathBuf::from("p/My-Note.md")
        );
        assert_eq!(unstamped_path(Path::new("p/Note.md")), PathBuf::from("p/Note.md"));
    }

    #[test]
    fn test_rename_batch_shares_stamp() {
        let storage = MemoryStorage::with_documents([
            ("p/One.md", "1"),
            ("p/Two Words.md", "2"),
            ("p/2020-01-01-Old.md", "3"),
        ]);
        let docs = storage
            .list_documents()
            .unwrap()
            .iter()
            .map(|p| storage.load(p).unwrap())
            .collect();

        let rule = RenameRule::new(date(), SpacePolicy::AllInName);
        let outcomes = rename_batch(&storage, docs, &rule);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        assert_eq!(outcomes.iter().filter(|o| o.is_unchanged()).count(), 1);

        assert_eq!(
            storage.list_documents().unwrap(),
            vec![
                PathBuf::from("p/2020-01-01-Old.md"),
                PathBuf::from("p/2024-03-02-One.md"),
                PathBuf::from("p/2024-03-02-Two-Words.md"),
            ]
        );
    }

    #[test]
    fn test_rename_batch_collects_failures() {
        let storage = MemoryStorage::with_documents([
            ("p/A.md", "a"),
            ("p/B.md", "b"),
            ("p/2024-03-02-B.md", "taken"),
        ]);
        let docs = vec![
            storage.load(Path::new("p/A.md")).unwrap(),
            storage.load(Path::new("p/B.md")).unwrap(),
        ];

        let rule = RenameRule::new(date(), SpacePolicy::AllInName);
        let outcomes = rename_batch(&storage, docs, &rule);

        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(O2Error::PathCollision(_))));
        assert!(storage.exists(Path::new("p/B.md")));
    }
}
