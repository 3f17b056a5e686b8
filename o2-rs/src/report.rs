//! Per-document results of batch operations.

use crate::error::O2Error;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The step of a batch at which a document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Copy,
    Move,
    Normalize,
    Rename,
}

/// One document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub stage: Stage,
    pub kind: String,
    pub error: String,
}

impl DocumentFailure {
    pub fn new(path: &Path, stage: Stage, error: &O2Error) -> Self {
        Self {
            path: path.to_path_buf(),
            stage,
            kind: error.kind().to_string(),
            error: error.to_string(),
        }
    }
}

/// Outcome of a batch whose items either succeed with `T` or fail.
#[derive(Debug, Serialize)]
pub struct BatchReport<T> {
    pub total: usize,
    pub succeeded: Vec<T>,
    pub failed: Vec<DocumentFailure>,
}

impl<T> BatchReport<T> {
    /// Split per-document results, keeping their order.
    pub fn from_results(results: Vec<Result<T, DocumentFailure>>) -> Self {
        let total = results.len();
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for result in results {
            match result {
                Ok(item) => succeeded.push(item),
                Err(failure) => failed.push(failure),
            }
        }
        Self {
            total,
            succeeded,
            failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// e.g. `"7 of 9 processed; 2 failed: a.md: Destination already exists: ..."`.
    pub fn summary(&self, verb: &str) -> String {
        summarize(self.succeeded.len(), self.total, verb, None, &self.failed)
    }
}

pub(crate) fn summarize(
    done: usize,
    total: usize,
    verb: &str,
    skipped: Option<usize>,
    failed: &[DocumentFailure],
) -> String {
    let mut summary = format!("{} of {} {}", done, total, verb);
    if let Some(skipped) = skipped.filter(|n| *n > 0) {
        summary.push_str(&format!(", {} skipped", skipped));
    }
    if !failed.is_empty() {
        let reasons = failed
            .iter()
            .map(|f| format!("{}: {}", f.path.display(), f.error))
            .collect::<Vec<_>>()
            .join("; ");
        summary.push_str(&format!("; {} failed: {}", failed.len(), reasons));
    }
    summary
}
