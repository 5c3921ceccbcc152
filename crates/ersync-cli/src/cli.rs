//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Mirror Eternal Return game data, localization and free-character
/// rotations into a git repository
#[derive(Parser, Debug)]
#[command(name = "ersync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./ersync.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Working copy to sync, overriding the config file
    #[arg(short, long, value_name = "PATH", env = "ERSYNC_REPO")]
    pub repo: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
