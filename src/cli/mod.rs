//! Command-line interface definitions.

pub mod check;
pub mod run;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::app::config::Config;
use crate::error::Result;

/// Oddwatch - promotional odds monitor with webhook and WebSocket alerts.
#[derive(Parser, Debug)]
#[command(name = "oddwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; environment variables are used if it is missing
    #[arg(short, long, global = true, default_value = "oddwatch.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitor until interrupted (default)
    Run(RunArgs),

    /// Poll one source once and print what it reports
    Check(CheckArgs),

    /// Validate configuration without starting anything
    Validate,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Source key as listed in the configuration
    pub source: String,

    /// Print listings as JSON
    #[arg(long)]
    pub json: bool,
}

/// Load `path` if it exists, otherwise build the configuration from the environment.
#[allow(clippy::result_large_err)]
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        info!(path = %path.display(), "No config file found, using environment only");
        Config::from_env()
    }
}
