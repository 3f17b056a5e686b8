//! Storage provider abstraction.
//!
//! All document I/O goes through [`Storage`]. The filesystem implementation is
//! [`crate::vault::Vault`]; [`MemoryStorage`] keeps documents in a map and is
//! used for dry runs and tests.

use crate::document::Document;
use crate::error::{O2Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A hierarchical document store addressed by relative paths.
///
/// Implementations must be safe to call concurrently on distinct paths.
/// `copy` and `rename` never overwrite: an existing destination is a
/// [`O2Error::PathCollision`].
pub trait Storage: Send + Sync {
    /// List every document path, sorted.
    fn list_documents(&self) -> Result<Vec<PathBuf>>;

    /// Read the content of a document.
    fn read(&self, path: &Path) -> Result<String>;

    /// Create or replace a document.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Duplicate `from` at `to`.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;

    /// Move `from` to `to`.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Check whether a document exists.
    fn exists(&self, path: &Path) -> bool;

    /// Load a document with its content.
    fn load(&self, path: &Path) -> Result<Document> {
        let content = self.read(path)?;
        Ok(Document::new(path, content))
    }

    /// List the documents under `dir` (component-wise prefix).
    fn list_under(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .list_documents()?
            .into_iter()
            .filter(|p| p.starts_with(dir))
            .collect())
    }
}

/// In-memory storage provider.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a storage from `(path, content)` pairs.
    pub fn with_documents<P, C>(documents: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let map = documents
            .into_iter()
            .map(|(p, c)| (p.into(), c.into()))
            .collect();
        Self {
            documents: Mutex::new(map),
        }
    }

    /// Copy every document of another provider into memory.
    pub fn snapshot(source: &dyn Storage) -> Result<Self> {
        let mut map = BTreeMap::new();
        for path in source.list_documents()? {
            let content = source.read(&path)?;
            map.insert(path, content);
        }
        Ok(Self {
            documents: Mutex::new(map),
        })
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn list_documents(&self) -> Result<Vec<PathBuf>> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| O2Error::DocumentNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.lock().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let mut docs = self.lock();
        let content = docs
            .get(from)
            .cloned()
            .ok_or_else(|| O2Error::DocumentNotFound(from.to_path_buf()))?;
        if docs.contains_key(to) {
            return Err(O2Error::PathCollision(to.to_path_buf()));
        }
        docs.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut docs = self.lock();
        if !docs.contains_key(from) {
            return Err(O2Error::DocumentNotFound(from.to_path_buf()));
        }
        if docs.contains_key(to) {
            return Err(O2Error::PathCollision(to.to_path_buf()));
        }
        if let Some(content) = docs.remove(from) {
            docs.insert(to.to_path_buf(), content);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }
}
