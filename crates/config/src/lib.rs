//! memc-load Configuration
//!
//! TOML-based configuration loading with sensible defaults. An empty file
//! reproduces the stock deployment: four partitions on localhost, five
//! workers and a queue size of ten.
//!
//! # Parsing
//!
//! ```
//! use memc_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[global]\nworkers = 8").unwrap();
//! assert_eq!(config.global.workers, 8);
//! assert_eq!(config.partitions.len(), 4);
//! ```
//!
//! # Full Config
//!
//! ```toml
//! [global]
//! pattern = "/data/appsinstalled/*.tsv.gz"
//! workers = 5
//! queue_size = 10
//! dry_run = false
//!
//! [log]
//! level = "info"
//! format = "console"
//! output = "stdout"
//!
//! [sink]
//! connect_timeout = "1s"
//! io_timeout = "3s"
//! retry_attempts = 3
//! retry_interval = "100ms"
//!
//! [partitions]
//! idfa = "127.0.0.1:33013"
//! gaid = "127.0.0.1:33014"
//! adid = "127.0.0.1:33015"
//! dvid = "127.0.0.1:33016"
//! ```

mod error;
mod global;
mod logging;
mod partitions;
mod sink;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use global::{DEFAULT_PATTERN, GlobalConfig};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use partitions::PartitionsConfig;
pub use sink::SinkConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input pattern, worker count, queue size, dry run
    pub global: GlobalConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// memcached client timeouts and retries
    pub sink: SinkConfig,

    /// Category → memcached address
    pub partitions: PartitionsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Run again after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.global.pattern, DEFAULT_PATTERN);
        assert_eq!(config.partitions.get("gaid"), Some("127.0.0.1:33014"));
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[global]
pattern = "/tmp/logs/*.tsv.gz"
workers = 2
queue_size = 100
dry_run = true

[log]
level = "debug"
output = "stderr"

[sink]
io_timeout = "500ms"
retry_attempts = 1

[partitions]
idfa = "10.0.0.1:11211"
gaid = "10.0.0.2:11211"
"#;
        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.global.pattern, "/tmp/logs/*.tsv.gz");
        assert_eq!(config.global.workers, 2);
        assert_eq!(config.global.queue_size, 100);
        assert!(config.global.dry_run);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.output, LogOutput::Stderr);
        assert_eq!(config.sink.io_timeout, Duration::from_millis(500));
        assert_eq!(config.sink.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.sink.retry_attempts, 1);
        assert_eq!(config.partitions.len(), 2);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_str("invalid { toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("memc-load.toml");
        fs::write(&path, "[global]\nworkers = 3\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.global.workers, 3);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/memc-load.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("/nonexistent/memc-load.toml"));
    }
}
