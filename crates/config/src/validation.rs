//! Configuration validation
//!
//! Checks run after parsing and again after CLI overrides:
//! - Worker and queue sizes are non-zero
//! - At least one retry attempt
//! - The input pattern compiles
//! - At least one partition, each with a `host:port` address

use memc_routing::is_valid_address;

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_global(config)?;
    validate_sink(config)?;
    validate_partitions(config)?;
    Ok(())
}

fn validate_global(config: &Config) -> Result<()> {
    let global = &config.global;

    if global.workers == 0 {
        return Err(ConfigError::invalid_value(
            "global",
            "workers",
            "must be at least 1",
        ));
    }
    if global.queue_size == 0 {
        return Err(ConfigError::invalid_value(
            "global",
            "queue_size",
            "must be at least 1",
        ));
    }

    glob::Pattern::new(&global.pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: global.pattern.clone(),
        source,
    })?;

    Ok(())
}

fn validate_sink(config: &Config) -> Result<()> {
    if config.sink.retry_attempts == 0 {
        return Err(ConfigError::invalid_value(
            "sink",
            "retry_attempts",
            "must be at least 1",
        ));
    }
    Ok(())
}

fn validate_partitions(config: &Config) -> Result<()> {
    if config.partitions.is_empty() {
        return Err(ConfigError::NoPartitions);
    }

    for (category, address) in config.partitions.iter() {
        if category.is_empty() {
            return Err(ConfigError::invalid_value(
                "partitions",
                "category",
                "must not be empty",
            ));
        }
        if !is_valid_address(address) {
            return Err(ConfigError::invalid_value(
                "partitions",
                category,
                format!("'{address}' is not host:port"),
            ));
        }
    }
    Ok(())
}
