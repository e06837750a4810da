//! memcached client settings

use std::time::Duration;

use serde::Deserialize;

/// Network behavior shared by every partition's client
///
/// ```toml
/// [sink]
/// connect_timeout = "1s"
/// io_timeout = "3s"
/// retry_attempts = 3
/// retry_interval = "100ms"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Timeout for one `set` request/reply exchange
    #[serde(with = "humantime_serde")]
    pub io_timeout: Duration,

    /// Attempts per record before it counts as failed
    pub retry_attempts: usize,

    #[serde(with = "humantime_serde")]
    pub retry_interval: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            io_timeout: Duration::from_secs(3),
            retry_attempts: 3,
            retry_interval: Duration::from_millis(100),
        }
    }
}
