//! Protocol error types
//!
//! Errors raised while turning a log line into a record, or while decoding
//! a stored value back into one.

use thiserror::Error;

/// Errors that can occur while parsing a log line
///
/// Every variant is recoverable: the pipeline counts it and skips the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Line has fewer tab-separated fields than a record needs
    #[error("malformed line: expected at least {expected} tab-separated fields, got {actual}")]
    MalformedLine { expected: usize, actual: usize },

    /// Category or device id is empty
    #[error("missing identity: {field} is empty")]
    MissingIdentity { field: &'static str },

    /// Latitude or longitude is not a finite number
    #[error("bad coordinate in {field}: {value:?}")]
    BadCoordinate { field: &'static str, value: String },

    /// App id token rejected under the strict policy
    #[error("bad app id at position {position}: {token:?}")]
    BadAppId { position: usize, token: String },
}

impl ParseError {
    /// Create a malformed line error
    #[inline]
    pub fn malformed(actual: usize) -> Self {
        Self::MalformedLine {
            expected: crate::FIELD_COUNT,
            actual,
        }
    }

    /// Create a missing identity error
    #[inline]
    pub fn missing_identity(field: &'static str) -> Self {
        Self::MissingIdentity { field }
    }

    /// Create a bad coordinate error
    #[inline]
    pub fn bad_coordinate(field: &'static str, value: impl Into<String>) -> Self {
        Self::BadCoordinate {
            field,
            value: value.into(),
        }
    }

    /// Short, stable name of the error kind (for log fields)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "malformed_line",
            Self::MissingIdentity { .. } => "missing_identity",
            Self::BadCoordinate { .. } => "bad_coordinate",
            Self::BadAppId { .. } => "bad_app_id",
        }
    }
}

/// Errors that can occur while decoding a stored value
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value bytes are not a valid `UserApps` message
    #[error("failed to decode value: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Storage key has no `category:id` separator
    #[error("malformed storage key: {0:?}")]
    MalformedKey(String),
}
