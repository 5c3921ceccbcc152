//! ersync
//!
//! Runs one sync: game data, localization, free-character rotations, then
//! push. Meant to be invoked by a scheduler; every flag is optional.

mod cli;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::{CliError, Result};
use ersync_core::{HttpFetcher, SyncConfig, SyncOrchestrator};

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %e, "Sync run failed");
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Variables already in the environment take precedence over `.env`.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");
    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let mut config = SyncConfig::load(cli.config.as_deref())?.with_api_key_from_env();
    if let Some(repo) = cli.repo {
        config.repo_path = repo;
    }

    let fetcher = HttpFetcher::new(&config)?;
    let report = SyncOrchestrator::new(&config, &fetcher).run()?;

    tracing::info!(
        state = %report.final_state,
        commits = report.commits(),
        "Sync complete"
    );
    Ok(())
}
