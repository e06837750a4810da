//! Effective settings: config file, then command-line overrides
//!
//! Precedence is command line, then config file, then built-in defaults.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use memc_config::{Config, LogLevel, LogOutput};

use crate::Overrides;

/// Build the effective configuration for this run
pub fn resolve(overrides: &Overrides) -> Result<Config> {
    let mut config = load_file(overrides.config.as_deref())?;
    apply(&mut config, overrides)?;
    config
        .validate()
        .context("invalid configuration after command-line overrides")?;
    Ok(config)
}

/// Load the config file, or the defaults when none was given
pub fn load_file(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            // User explicitly provided config path - must exist
            if !path.exists() {
                return Err(anyhow!("config file not found: {}", path.display()));
            }
            Config::from_file(path).context("failed to load configuration")
        }
        None => Ok(Config::default()),
    }
}

/// Apply command-line overrides on top of a loaded configuration
pub fn apply(config: &mut Config, overrides: &Overrides) -> Result<()> {
    if let Some(pattern) = &overrides.pattern {
        config.global.pattern = pattern.clone();
    }
    if let Some(workers) = overrides.workers {
        config.global.workers = workers;
    }
    if let Some(queue_size) = overrides.queue_size {
        config.global.queue_size = queue_size;
    }
    if overrides.dry {
        config.global.dry_run = true;
    }

    if let Some(path) = &overrides.log {
        config.log.output = LogOutput::File(path.clone());
    }
    if let Some(level) = &overrides.log_level {
        config.log.level = level.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }

    let addresses = [
        ("idfa", &overrides.idfa),
        ("gaid", &overrides.gaid),
        ("adid", &overrides.adid),
        ("dvid", &overrides.dvid),
    ];
    for (category, address) in addresses {
        if let Some(address) = address {
            config.partitions.set(category, address.clone());
        }
    }

    Ok(())
}
