//! Tracing subscriber setup

use std::sync::Mutex;

use anyhow::{Context, Result};
use memc_config::{LogConfig, LogFormat, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging
///
/// Fails when the log file cannot be opened.
pub fn init_logging(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(log.level.as_str())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let (writer, ansi) = match &log.output {
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogOutput::File(_) => {
            let file = log
                .output
                .open_file()
                .context("failed to open log file")?
                .context("log output is not a file")?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    match log.format {
        LogFormat::Console => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .with(filter)
            .init(),
    }

    Ok(())
}
