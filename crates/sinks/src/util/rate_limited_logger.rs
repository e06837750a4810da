//! Rate-limited error logging
//!
//! A dead memcached turns every record into a failed `set`. This logger
//! emits at most one line per interval for a partition, carrying the number
//! of failures suppressed since the previous line.
//!
//! # Example
//!
//! ```
//! use memc_sinks::util::RateLimitedLogger;
//! use std::time::Duration;
//!
//! let logger = RateLimitedLogger::new("127.0.0.1:33013", Duration::from_secs(10));
//! let err = std::io::Error::other("connection refused");
//!
//! assert!(logger.error("idfa:dev", &err));
//! assert!(!logger.error("idfa:dev2", &err));
//! assert_eq!(logger.total_error_count(), 2);
//! ```

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default interval between log lines
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Longest key echoed into the log
const MAX_KEY_LOG_LENGTH: usize = 64;

/// Per-address rate-limited error logger
///
/// Thread-safe: counters are atomic, the last log time sits behind a mutex.
pub struct RateLimitedLogger {
    address: String,
    min_interval: Duration,
    last_log_time: Mutex<Option<Instant>>,
    /// Errors since the last emitted line
    error_count: AtomicU64,
    total_errors: AtomicU64,
}

impl RateLimitedLogger {
    pub fn new(address: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            address: address.into(),
            min_interval,
            last_log_time: Mutex::new(None),
            error_count: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
        }
    }

    /// Logger with the default 10 second interval
    pub fn with_default_interval(address: impl Into<String>) -> Self {
        Self::new(address, DEFAULT_LOG_INTERVAL)
    }

    /// Record a failed `set` and log it if the interval has elapsed
    ///
    /// Returns true if a line was emitted.
    pub fn error(&self, key: &str, error: &dyn Display) -> bool {
        self.error_count.fetch_add(1, Ordering::Relaxed);
        let total = self.total_errors.fetch_add(1, Ordering::Relaxed) + 1;

        if !self.should_log() {
            return false;
        }

        let suppressed = self.error_count.swap(0, Ordering::Relaxed).saturating_sub(1);
        let key = truncate(key);

        if suppressed > 0 {
            tracing::error!(
                address = %self.address,
                key = %key,
                error = %error,
                suppressed_count = suppressed,
                total_errors = total,
                "sink write failed (rate-limited)"
            );
        } else {
            tracing::error!(
                address = %self.address,
                key = %key,
                error = %error,
                total_errors = total,
                "sink write failed"
            );
        }
        true
    }

    fn should_log(&self) -> bool {
        let mut last_time = self.last_log_time.lock();
        let now = Instant::now();

        match *last_time {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                *last_time = Some(now);
                true
            }
        }
    }

    /// Errors recorded since the last emitted line
    pub fn pending_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn total_error_count(&self) -> u64 {
        self.total_errors.load(Ordering::Relaxed)
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

fn truncate(key: &str) -> &str {
    if key.len() <= MAX_KEY_LOG_LENGTH {
        return key;
    }
    let mut end = MAX_KEY_LOG_LENGTH;
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    &key[..end]
}
