//! memc-load - Load gzip app-install logs into memcached
//!
//! # Usage
//!
//! ```bash
//! # Load every matching file (default)
//! memc-load --pattern '/data/appsinstalled/*.tsv.gz'
//! memc-load --config configs/memc-load.toml --workers 8
//!
//! # Parse and write nothing
//! memc-load --dry --log-level debug
//!
//! # Verify the value codec on built-in sample lines
//! memc-load check
//! ```

mod cmd;
mod logging;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

/// memc-load - Load gzip app-install logs into memcached
#[derive(Parser, Debug)]
#[command(name = "memc-load")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every file matching the pattern (default)
    Load,

    /// Round-trip built-in sample lines through the value codec
    Check,
}

/// Command-line settings; each one overrides the config file
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Glob pattern of input files
    #[arg(long, global = true)]
    pub pattern: Option<String>,

    /// Number of ingestion workers
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Capacity of the line queue and of each partition queue
    #[arg(long, alias = "bufsize", global = true)]
    pub queue_size: Option<usize>,

    /// Parse and log records without writing to memcached
    #[arg(long, global = true)]
    pub dry: bool,

    /// Reject lines with invalid app ids instead of storing them as 0
    #[arg(long, global = true)]
    pub strict_app_ids: bool,

    /// Append logs to this file instead of stdout
    #[arg(long, global = true)]
    pub log: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Memcached address for idfa devices
    #[arg(long, global = true)]
    pub idfa: Option<String>,

    /// Memcached address for gaid devices
    #[arg(long, global = true)]
    pub gaid: Option<String>,

    /// Memcached address for adid devices
    #[arg(long, global = true)]
    pub adid: Option<String>,

    /// Memcached address for dvid devices
    #[arg(long, global = true)]
    pub dvid: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Check) => {
            let config = settings::resolve(&cli.overrides)?;
            logging::init_logging(&config.log)?;
            cmd::check::run()
        }
        // No subcommand = load (default behavior)
        Some(Command::Load) | None => {
            let config = settings::resolve(&cli.overrides)?;
            logging::init_logging(&config.log)?;
            cmd::load::run(config, cli.overrides.strict_app_ids)
                .await
                .context("load failed")
        }
    }
}

