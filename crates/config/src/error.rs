//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
///
/// All of these are fatal: nothing is loaded with a bad configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A field is out of range or malformed
    #[error("[{section}] has invalid {field}: {message}")]
    InvalidValue {
        section: &'static str,
        field: String,
        message: String,
    },

    /// Input pattern is not a valid glob
    #[error("invalid input pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// No partitions configured
    #[error("no partitions are configured - at least one category must map to a memcached address")]
    NoPartitions,

    /// Partition registry rejected the configuration
    #[error("invalid partitions: {0}")]
    Partitions(#[from] memc_routing::RoutingError),

    /// Log file could not be opened
    #[error("cannot open log file '{path}': {source}")]
    LogDestination {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub fn invalid_value(
        section: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            section,
            field: field.into(),
            message: message.into(),
        }
    }
}
