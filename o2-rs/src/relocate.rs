//! Moving and copying documents between directories by path-prefix rewrite.

use crate::document::Document;
use crate::error::{O2Error, Result};
use crate::storage::Storage;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether the source document survives relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateMode {
    Copy,
    Move,
}

/// Rewrites a path by substituting the first occurrence of a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRewriteRule {
    pub match_prefix: String,
    pub replacement_prefix: String,
}

impl PathRewriteRule {
    pub fn new(match_prefix: impl Into<String>, replacement_prefix: impl Into<String>) -> Self {
        Self {
            match_prefix: match_prefix.into(),
            replacement_prefix: replacement_prefix.into(),
        }
    }

    /// Compute the destination path for `path`.
    ///
    /// The match is a literal substring search on the path text, not a
    /// component match, so `"draft"` also matches inside `"drafts/x.md"`.
    pub fn apply(&self, path: &Path) -> Result<PathBuf> {
        let text = path.to_string_lossy();
        if self.match_prefix.is_empty() || !text.contains(self.match_prefix.as_str()) {
            return Err(O2Error::PrefixNotFound {
                path: path.to_path_buf(),
                prefix: self.match_prefix.clone(),
            });
        }
        Ok(PathBuf::from(text.replacen(
            self.match_prefix.as_str(),
            &self.replacement_prefix,
            1,
        )))
    }
}

/// Relocate a document according to `rule`.
///
/// Returns the document at its new path with unchanged content. In
/// [`RelocateMode::Move`] the original path no longer exists afterwards.
pub fn relocate<S: Storage + ?Sized>(
    storage: &S,
    doc: &Document,
    rule: &PathRewriteRule,
    mode: RelocateMode,
) -> Result<Document> {
    let new_path = rule.apply(&doc.path)?;

    match mode {
        RelocateMode::Copy => storage.copy(&doc.path, &new_path)?,
        RelocateMode::Move => storage.rename(&doc.path, &new_path)?,
    }

    debug!(
        from = %doc.path.display(),
        to = %new_path.display(),
        ?mode,
        "relocated"
    );

    Ok(Document::new(new_path, doc.content.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn rule() -> PathRewriteRule {
        PathRewriteRule::new("draft", "published")
    }

    #[test]
    fn test_apply_first_occurrence_only() {
        let path = rule().apply(Path::new("draft/draft notes.md")).unwrap();
        assert_eq!(path, PathBuf::from("published/draft notes.md"));
    }

    #[test]
    fn test_apply_missing_prefix() {
        let result = rule().apply(Path::new("notes/x.md"));
        assert!(matches!(result, Err(O2Error::PrefixNotFound { .. })));
    }

    #[test]
    fn test_apply_empty_prefix_is_rejected() {
        let result = PathRewriteRule::new("", "published").apply(Path::new("x.md"));
        assert!(matches!(result, Err(O2Error::PrefixNotFound { .. })));
    }

    #[test]
    fn test_copy_keeps_original() {
        let storage = MemoryStorage::with_documents([("draft/x.md", "hello")]);
        let doc = storage.load(Path::new("draft/x.md")).unwrap();

        let copied = relocate(&storage, &doc, &rule(), RelocateMode::Copy).unwrap();

        assert_eq!(copied.path, PathBuf::from("published/x.md"));
        assert_eq!(copied.content, "hello");
        assert_eq!(storage.read(Path::new("published/x.md")).unwrap(), "hello");
        assert_eq!(storage.read(Path::new("draft/x.md")).unwrap(), "hello");
    }

    #[test]
    fn test_move_removes_original() {
        let storage = MemoryStorage::with_documents([("draft/x.md", "hello")]);
        let doc = storage.load(Path::new("draft/x.md")).unwrap();

        let moved = relocate(&storage, &doc, &rule(), RelocateMode::Move).unwrap();

        assert_eq!(moved.path, PathBuf::from("published/x.md"));
        assert!(!storage.exists(Path::new("draft/x.md")));
    }

    #[test]
    fn test_collision() {
        let storage =
            MemoryStorage::with_documents([("draft/x.md", "new"), ("published/x.md", "old")]);
        let doc = storage.load(Path::new("draft/x.md")).unwrap();

        let result = relocate(&storage, &doc, &rule(), RelocateMode::Copy);

        assert!(matches!(result, Err(O2Error::PathCollision(_))));
        assert_eq!(storage.read(Path::new("published/x.md")).unwrap(), "old");
    }
}
