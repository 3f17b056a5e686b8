//! Normalize-links command.

use crate::cli::args::NormalizeLinksArgs;
use crate::cli::output::Output;
use crate::error::{ExitCode, Result};
use crate::report::{BatchReport, DocumentFailure, Stage};
use crate::storage::Storage;
use crate::vault::Vault;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Links removed from one note.
#[derive(Debug, Serialize)]
pub struct Normalized {
    pub path: PathBuf,
    pub links_removed: usize,
}

/// Output for normalize-links command.
#[derive(Debug, Serialize)]
pub struct NormalizeOutput {
    pub dry_run: bool,
    pub message: String,
    pub report: BatchReport<Normalized>,
}

/// Strip wiki links from the notes at `paths`.
///
/// Notes without links are not rewritten. With `dry_run` nothing is written
/// and the report shows what would change.
pub fn normalize_documents(
    storage: &dyn Storage,
    paths: &[PathBuf],
    dry_run: bool,
) -> BatchReport<Normalized> {
    let results = paths
        .par_iter()
        .map(|path| -> std::result::Result<Normalized, DocumentFailure> {
            let doc = storage
                .load(path)
                .map_err(|e| DocumentFailure::new(path, Stage::Load, &e))?;
            let links_removed = doc.link_count();
            if links_removed > 0 && !dry_run {
                let normalized = doc.with_normalized_links();
                storage
                    .write(path, &normalized.content)
                    .map_err(|e| DocumentFailure::new(path, Stage::Normalize, &e))?;
                debug!(path = %path.display(), links_removed, "normalized");
            }
            Ok(Normalized {
                path: path.clone(),
                links_removed,
            })
        })
        .collect();

    BatchReport::from_results(results)
}

/// Execute normalize-links command.
pub fn run(vault: &Vault, args: &NormalizeLinksArgs, output: &Output) -> Result<ExitCode> {
    let paths = match &args.glob {
        Some(pattern) => vault.list_matching(pattern)?,
        None => vault.list_documents()?,
    };

    let mut report = normalize_documents(vault, &paths, args.dry_run);
    let changed = report.succeeded.iter().filter(|n| n.links_removed > 0).count();
    let links: usize = report.succeeded.iter().map(|n| n.links_removed).sum();
    let message = format!(
        "{} links in {} of {} notes{}",
        links,
        changed,
        report.total,
        if args.dry_run { " would be stripped" } else { " stripped" }
    );
    output.info(&message);

    // Untouched notes are noise in the listing
    report.succeeded.retain(|n| n.links_removed > 0);

    let code = if report.is_success() {
        ExitCode::Success
    } else {
        ExitCode::DocumentsFailed
    };
    output.print(&NormalizeOutput {
        dry_run: args.dry_run,
        message,
        report,
    })?;
    Ok(code)
}
