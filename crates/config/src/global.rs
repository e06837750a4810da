//! Global loader settings

use serde::Deserialize;

/// Default input file pattern
pub const DEFAULT_PATTERN: &str = "/data/appsinstalled/*.tsv.gz";

/// Pipeline and input settings
///
/// ```toml
/// [global]
/// pattern = "/data/appsinstalled/*.tsv.gz"
/// workers = 5
/// queue_size = 10
/// dry_run = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Glob selecting input files
    pub pattern: String,

    /// Ingestion workers per file
    pub workers: usize,

    /// Capacity of the line queue and of every partition queue
    pub queue_size: usize,

    /// Log instead of writing to memcached
    pub dry_run: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.into(),
            workers: 5,
            queue_size: 10,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.pattern, "/data/appsinstalled/*.tsv.gz");
        assert_eq!(config.workers, 5);
        assert_eq!(config.queue_size, 10);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GlobalConfig = toml::from_str("workers = 12\ndry_run = true").unwrap();
        assert_eq!(config.workers, 12);
        assert!(config.dry_run);
        // Defaults still apply
        assert_eq!(config.queue_size, 10);
        assert_eq!(config.pattern, DEFAULT_PATTERN);
    }
}
