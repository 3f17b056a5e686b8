//! CLI argument definitions using clap.

use crate::pipeline::RenameTarget;
use crate::rename::SpacePolicy;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "o2")]
#[command(
    author,
    version,
    about = "Promote draft notes of an Obsidian-style vault",
    long_about = None
)]
pub struct Cli {
    /// Path to the vault (overrides config default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Config file (default: $O2_CONFIG or <config dir>/o2/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Draft directory, relative to the vault (overrides config)
    #[arg(long, global = true)]
    pub draft_dir: Option<String>,

    /// Published directory, relative to the vault (overrides config)
    #[arg(long, global = true)]
    pub published_dir: Option<String>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log filter for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strip [[wiki links]] from every note, keeping the link text
    #[command(name = "normalize-links")]
    NormalizeLinks(NormalizeLinksArgs),

    /// Copy every note to <name><suffix>.md
    Duplicate(DuplicateArgs),

    /// Move one note from the draft directory to the published directory
    #[command(name = "move-to-published")]
    MoveToPublished(MoveToPublishedArgs),

    /// Copy drafts to the published directory, strip links and date-stamp them
    Promote(PromoteArgs),

    /// Date-stamp notes without copying them
    Rename(RenameArgs),
}

#[derive(Args, Debug)]
pub struct NormalizeLinksArgs {
    /// Only notes matching this glob (relative to the vault)
    #[arg(long)]
    pub glob: Option<String>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct DuplicateArgs {
    /// Suffix inserted before .md (overrides config)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Only notes matching this glob (relative to the vault)
    #[arg(long)]
    pub glob: Option<String>,
}

#[derive(Args, Debug)]
pub struct MoveToPublishedArgs {
    /// Note path relative to the vault (.md optional)
    pub path: String,
}

/// Options shared by the commands that stamp notes.
#[derive(Args, Debug)]
pub struct StampArgs {
    /// Stamp date instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// How spaces become hyphens (overrides config)
    #[arg(long, value_enum)]
    pub space_policy: Option<SpacePolicy>,

    /// Stamp notes that already start with a date
    #[arg(long)]
    pub restamp: bool,
}

#[derive(Args, Debug)]
pub struct PromoteArgs {
    #[command(flatten)]
    pub stamp: StampArgs,

    /// Which copy receives the date stamp (overrides config)
    #[arg(long, value_enum)]
    pub rename_target: Option<RenameTarget>,

    /// Keep [[wiki links]] in the published copies
    #[arg(long)]
    pub no_normalize: bool,

    /// Run against an in-memory snapshot; nothing is written
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub stamp: StampArgs,

    /// Rename every note in the vault, not just the draft directory
    #[arg(long)]
    pub all: bool,
}
