//! Duplicate command: copy every note next to itself under a suffixed name.

use crate::cli::args::DuplicateArgs;
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::{ExitCode, Result};
use crate::report::{BatchReport, DocumentFailure, Stage};
use crate::storage::Storage;
use crate::vault::Vault;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A copy that was created.
#[derive(Debug, Serialize)]
pub struct Duplicated {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Output for duplicate command.
#[derive(Debug, Serialize)]
pub struct DuplicateOutput {
    pub message: String,
    pub report: BatchReport<Duplicated>,
}

/// `notes/a.md` with suffix `_copy` becomes `notes/a_copy.md`.
pub fn duplicate_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    path.with_file_name(format!("{}{}.md", stem, suffix))
}

fn is_duplicate(path: &Path, suffix: &str) -> bool {
    !suffix.is_empty()
        && path
            .file_stem()
            .map(|s| s.to_string_lossy().ends_with(suffix))
            .unwrap_or(false)
}

/// Copy each note at `paths` to its suffixed name.
///
/// Notes whose name already ends with the suffix are copies themselves and
/// are left out of the batch.
pub fn duplicate_documents(
    storage: &dyn Storage,
    paths: &[PathBuf],
    suffix: &str,
) -> BatchReport<Duplicated> {
    let results = paths
        .par_iter()
        .filter(|path| !is_duplicate(path, suffix))
        .map(|path| -> std::result::Result<Duplicated, DocumentFailure> {
            let to = duplicate_path(path, suffix);
            storage
                .copy(path, &to)
                .map_err(|e| DocumentFailure::new(path, Stage::Copy, &e))?;
            Ok(Duplicated {
                from: path.clone(),
                to,
            })
        })
        .collect();

    BatchReport::from_results(results)
}

/// Execute duplicate command.
pub fn run(
    vault: &Vault,
    config: &Config,
    args: &DuplicateArgs,
    output: &Output,
) -> Result<ExitCode> {
    let suffix = args.suffix.as_deref().unwrap_or(&config.duplicate_suffix);
    let paths = match &args.glob {
        Some(pattern) => vault.list_matching(pattern)?,
        None => vault.list_documents()?,
    };

    let report = duplicate_documents(vault, &paths, suffix);
    let message = report.summary("duplicated");
    output.info(&message);

    let code = if report.is_success() {
        ExitCode::Success
    } else {
        ExitCode::DocumentsFailed
    };
    output.print(&DuplicateOutput { message, report })?;
    Ok(code)
}
