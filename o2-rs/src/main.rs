//! o2 CLI entry point.

use clap::Parser;
use o2::cli::args::{Cli, Commands};
use o2::cli::output::Output;
use o2::cli::{duplicate, move_note, normalize, promote, rename};
use o2::config::Config;
use o2::error::{ExitCode as O2ExitCode, O2Error};
use o2::vault::Vault;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("o2={}", cli.log_level())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, O2Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.draft_dir {
        config.draft_dir = dir.clone();
    }
    if let Some(dir) = &cli.published_dir {
        config.published_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<O2ExitCode, O2Error> {
    let config = load_config(cli)?;

    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    let vault = Vault::new(vault_path)?;
    debug!(
        vault = %vault.root.display(),
        draft = %config.draft_dir,
        published = %config.published_dir,
        "starting"
    );

    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::NormalizeLinks(args) => normalize::run(&vault, args, &output),
        Commands::Duplicate(args) => duplicate::run(&vault, &config, args, &output),
        Commands::MoveToPublished(args) => move_note::run(&vault, &config, args, &output),
        Commands::Promote(args) => promote::run(&vault, &config, args, &output),
        Commands::Rename(args) => rename::run(&vault, &config, args, &output),
    }
}
