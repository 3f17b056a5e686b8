//! Document representation.

use crate::parser::wikilink;
use std::path::PathBuf;

/// A text document managed by a storage provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the storage root (e.g., "draft/My Note.md").
    pub path: PathBuf,

    /// Raw content of the document.
    pub content: String,
}

impl Document {
    /// Create a new document from path and content.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Number of wiki links in the content.
    pub fn link_count(&self) -> usize {
        wikilink::count_links(&self.content)
    }

    /// Same path, content with wiki links stripped.
    pub fn with_normalized_links(&self) -> Self {
        Self {
            path: self.path.clone(),
            content: wikilink::normalize_links(&self.content),
        }
    }
}
