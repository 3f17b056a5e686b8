//! Move-to-published command.

use crate::cli::args::MoveToPublishedArgs;
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::{ExitCode, Result};
use crate::relocate::{RelocateMode, relocate};
use crate::storage::Storage;
use crate::vault::Vault;
use serde::Serialize;
use std::path::PathBuf;

/// Output for move-to-published command.
#[derive(Debug, Serialize)]
pub struct MoveOutput {
    pub from: PathBuf,
    pub to: PathBuf,
    pub message: String,
}

/// Execute move-to-published command.
pub fn run(
    vault: &Vault,
    config: &Config,
    args: &MoveToPublishedArgs,
    output: &Output,
) -> Result<ExitCode> {
    let path = vault.normalize_note_path(&args.path);
    let doc = vault.load(&path)?;

    let moved = relocate(vault, &doc, &config.publish_rule(), RelocateMode::Move)?;

    output.print(&MoveOutput {
        from: path,
        to: moved.path,
        message: "Note moved to published directory".to_string(),
    })?;
    Ok(ExitCode::Success)
}
