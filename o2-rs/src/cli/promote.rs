//! Promote command: the full draft-to-published pipeline.

use crate::adapter::NoopAdapter;
use crate::cli::args::PromoteArgs;
use crate::cli::output::Output;
use crate::cli::rename::rename_rule;
use crate::config::Config;
use crate::error::{ExitCode, Result};
use crate::pipeline::{PromoteSettings, Promoter, PromotionReport};
use crate::storage::{MemoryStorage, Storage};
use crate::vault::Vault;
use serde::Serialize;

/// Output for promote command.
#[derive(Debug, Serialize)]
pub struct PromoteOutput {
    pub dry_run: bool,
    pub message: String,
    pub report: PromotionReport,
}

/// Combine config and command-line overrides.
pub fn settings(config: &Config, args: &PromoteArgs) -> Result<PromoteSettings> {
    let rule = rename_rule(config, &args.stamp)?;
    let mut settings = PromoteSettings::from_config(config, rule.stamp);
    settings.rename_rule = rule;
    if let Some(target) = args.rename_target {
        settings.rename_target = target;
    }
    if args.no_normalize {
        settings.normalize_links = false;
    }
    Ok(settings)
}

/// Execute promote command.
pub fn run(
    vault: &Vault,
    config: &Config,
    args: &PromoteArgs,
    output: &Output,
) -> Result<ExitCode> {
    let settings = settings(config, args)?;

    let report = if args.dry_run {
        let snapshot = MemoryStorage::snapshot(vault)?;
        promote_with(&snapshot, settings)?
    } else {
        promote_with(vault, settings)?
    };

    let message = if args.dry_run {
        format!("dry run: {}", report.summary())
    } else {
        report.summary()
    };
    output.info(&message);

    let code = if report.is_success() {
        ExitCode::Success
    } else {
        ExitCode::DocumentsFailed
    };
    output.print(&PromoteOutput {
        dry_run: args.dry_run,
        message,
        report,
    })?;
    Ok(code)
}

fn promote_with(storage: &dyn Storage, settings: PromoteSettings) -> Result<PromotionReport> {
    Promoter::new(storage, &NoopAdapter, settings).promote()
}
