//! Filesystem-backed vault.

use crate::error::{O2Error, Result};
use crate::storage::Storage;
use glob::glob;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Represents an Obsidian vault on disk.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,
}

impl Vault {
    /// Create a new vault instance.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(O2Error::VaultNotFound(root));
        }

        Ok(Self { root })
    }

    /// Get the full path to a document.
    pub fn full_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Normalize a note path (add .md extension if needed).
    pub fn normalize_note_path(&self, path: &str) -> PathBuf {
        let path = path.trim();
        if path.ends_with(".md") {
            PathBuf::from(path)
        } else {
            PathBuf::from(format!("{}.md", path))
        }
    }

    /// List documents matching a glob pattern relative to the vault root.
    pub fn list_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = self.root.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        let mut notes = Vec::new();

        for entry in glob(&pattern_str)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() || path.extension().map(|e| e != "md").unwrap_or(true) {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        // Skip hidden files and directories
                        if !relative
                            .components()
                            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                        {
                            notes.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    warn!("glob error: {}", e);
                }
            }
        }

        notes.sort();
        Ok(notes)
    }

    fn ensure_parent(&self, full_path: &Path) -> Result<()> {
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Storage for Vault {
    fn list_documents(&self) -> Result<Vec<PathBuf>> {
        self.list_matching("**/*.md")
    }

    fn read(&self, path: &Path) -> Result<String> {
        if !self.exists(path) {
            return Err(O2Error::DocumentNotFound(path.to_path_buf()));
        }
        Ok(std::fs::read_to_string(self.full_path(path))?)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.full_path(path);
        self.ensure_parent(&full_path)?;
        std::fs::write(&full_path, content)?;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let content = self.read(from)?;
        let to_full = self.full_path(to);
        self.ensure_parent(&to_full)?;

        // create_new makes the existence check and the creation one step
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&to_full) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(O2Error::PathCollision(to.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content.as_bytes())?;
        debug!(from = %from.display(), to = %to.display(), "copied");
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if !self.exists(from) {
            return Err(O2Error::DocumentNotFound(from.to_path_buf()));
        }

        let from_full = self.full_path(from);
        let to_full = self.full_path(to);
        self.ensure_parent(&to_full)?;

        // fs::rename replaces an existing target; hard_link refuses to, so the
        // existence check and the claim on `to` are one step
        match std::fs::hard_link(&from_full, &to_full) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(O2Error::PathCollision(to.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        }
        std::fs::remove_file(&from_full)?;
        debug!(from = %from.display(), to = %to.display(), "renamed");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.full_path(path).is_file()
    }
}
