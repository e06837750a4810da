//! Common types shared by all sink clients

use std::time::Duration;

use thiserror::Error;

/// Longest key memcached accepts
pub const MAX_KEY_LENGTH: usize = 250;

/// Network options for memcached clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkOptions {
    /// Timeout for establishing a TCP connection
    pub connect_timeout: Duration,

    /// Timeout for one request/reply exchange
    pub io_timeout: Duration,

    /// Attempts per `set` before giving up (at least 1)
    pub retry_attempts: usize,

    /// Wait between attempts
    pub retry_interval: Duration,

    /// TCP keep-alive interval, `None` disables keep-alive
    pub tcp_keepalive: Option<Duration>,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            io_timeout: Duration::from_secs(3),
            retry_attempts: 3,
            retry_interval: Duration::from_millis(100),
            tcp_keepalive: Some(Duration::from_secs(30)),
        }
    }
}

impl SinkOptions {
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    #[must_use]
    pub fn with_tcp_keepalive(mut self, interval: Option<Duration>) -> Self {
        self.tcp_keepalive = interval;
        self
    }
}

/// Sink errors
///
/// All of these are per-record: the caller counts them and moves on.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Could not connect to the server
    #[error("connection to {address} failed: {source}")]
    Connection {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Connect or request/reply exchange timed out
    #[error("{operation} to {address} timed out")]
    Timeout {
        address: String,
        operation: &'static str,
    },

    /// I/O error on an established connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server answered something other than `STORED`
    #[error("server rejected set: {reply}")]
    Rejected { reply: String },

    /// Key cannot be sent over the text protocol
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Every attempt failed
    #[error("all {attempts} attempts failed: {last_error}")]
    RetriesExhausted { attempts: usize, last_error: String },

    /// Partition queue closed before the payload was delivered
    #[error("partition queue closed")]
    QueueClosed,
}

impl SinkError {
    #[inline]
    pub fn connection(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Connection {
            address: address.into(),
            source,
        }
    }

    #[inline]
    pub fn timeout(address: impl Into<String>, operation: &'static str) -> Self {
        Self::Timeout {
            address: address.into(),
            operation,
        }
    }

    #[inline]
    pub fn rejected(reply: impl Into<String>) -> Self {
        Self::Rejected {
            reply: reply.into(),
        }
    }

    #[inline]
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }

    /// Whether another attempt on a fresh connection could succeed
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Timeout { .. } | Self::Io(_)
        )
    }
}

/// Check a key against the memcached text protocol rules
pub fn validate_key(key: &str) -> Result<(), SinkError> {
    if key.is_empty() {
        return Err(SinkError::invalid_key(key, "empty"));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(SinkError::invalid_key(key, "longer than 250 bytes"));
    }
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SinkError::invalid_key(
            key,
            "contains whitespace or control characters",
        ));
    }
    Ok(())
}
