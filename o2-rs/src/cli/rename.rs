//! Rename command: date-stamp notes in place.

use crate::cli::args::{RenameArgs, StampArgs};
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::{ExitCode, O2Error, Result};
use crate::rename::{RenameRule, rename_batch};
use crate::report::{BatchReport, DocumentFailure, Stage};
use crate::storage::Storage;
use crate::vault::Vault;
use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A note after stamping.
#[derive(Debug, Serialize)]
pub struct Renamed {
    pub from: PathBuf,
    pub to: PathBuf,
    /// True when the note already carried a stamp and kept its name.
    pub unchanged: bool,
}

/// Output for rename command.
#[derive(Debug, Serialize)]
pub struct RenameOutput {
    pub stamp: String,
    pub message: String,
    pub report: BatchReport<Renamed>,
}

/// Parse `--date`, defaulting to today's local date.
pub fn stamp_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| O2Error::InvalidDate(text.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

/// Build the rename rule from config plus command-line overrides.
pub fn rename_rule(config: &Config, args: &StampArgs) -> Result<RenameRule> {
    let stamp = stamp_date(args.date.as_deref())?;
    let policy = args.space_policy.unwrap_or(config.rename.space_policy);
    Ok(RenameRule::new(stamp, policy).with_restamp(args.restamp || config.rename.restamp))
}

/// Stamp the notes at `paths`, collecting one result per note.
pub fn rename_documents(
    storage: &dyn Storage,
    paths: &[PathBuf],
    rule: &RenameRule,
) -> BatchReport<Renamed> {
    let loaded: Vec<_> = paths.par_iter().map(|path| storage.load(path)).collect();

    let mut results = Vec::with_capacity(paths.len());
    let mut docs = Vec::new();
    for (path, doc) in paths.iter().zip(loaded) {
        match doc {
            Ok(doc) => docs.push(doc),
            Err(e) => results.push(Err(DocumentFailure::new(path, Stage::Load, &e))),
        }
    }

    for outcome in rename_batch(storage, docs, rule) {
        let unchanged = outcome.is_unchanged();
        results.push(match outcome.result {
            Ok(doc) => Ok(Renamed {
                from: outcome.from,
                to: doc.path,
                unchanged,
            }),
            Err(e) => Err(DocumentFailure::new(&outcome.from, Stage::Rename, &e)),
        });
    }

    BatchReport::from_results(results)
}

/// Execute rename command.
pub fn run(vault: &Vault, config: &Config, args: &RenameArgs, output: &Output) -> Result<ExitCode> {
    let rule = rename_rule(config, &args.stamp)?;
    let paths = if args.all {
        vault.list_documents()?
    } else {
        vault.list_under(Path::new(&config.draft_dir))?
    };

    let report = rename_documents(vault, &paths, &rule);
    let message = report.summary("renamed");
    output.info(&message);

    let code = if report.is_success() {
        ExitCode::Success
    } else {
        ExitCode::DocumentsFailed
    };
    output.print(&RenameOutput {
        stamp: rule.stamp_str(),
        message,
        report,
    })?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::SpacePolicy;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_stamp_date() {
        assert_eq!(
            stamp_date(Some("2024-03-02")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert!(matches!(stamp_date(Some("02/03/2024")), Err(O2Error::InvalidDate(_))));
        assert!(stamp_date(None).is_ok());
    }

    #[test]
    fn test_rename_rule_overrides() {
        let config = Config::default();
        let args = StampArgs {
            date: Some("2024-03-02".to_string()),
            space_policy: Some(SpacePolicy::Preserve),
            restamp: false,
        };

        let rule = rename_rule(&config, &args).unwrap();
        assert_eq!(rule.space_policy, SpacePolicy::Preserve);
        assert!(!rule.restamp);
        assert_eq!(rule.stamp_str(), "2024-03-02");
    }

    #[test]
    fn test_rename_documents_reports_missing_note() {
        let storage = MemoryStorage::with_documents([("draft/a.md", "A")]);
        let stamp = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let rule = RenameRule::new(stamp, SpacePolicy::AllInName);
        let paths = vec![PathBuf::from("draft/a.md"), PathBuf::from("draft/gone.md")];

        let report = rename_documents(&storage, &paths, &rule);

        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded.len(), 1);
        assert_eq!(report.succeeded[0].to, PathBuf::from("draft/2024-03-02-a.md"));
        assert_eq!(report.failed[0].stage, Stage::Load);
        assert_eq!(report.failed[0].kind, "document_not_found");
    }
}
