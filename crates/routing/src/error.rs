//! Routing error types

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors raised while building or querying the partition table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Record category has no registered partition
    #[error("unknown category '{category}'")]
    UnknownCategory {
        /// Category taken from the record
        category: String,
    },

    /// Category registered twice
    #[error("duplicate partition for category '{category}'")]
    DuplicateCategory {
        /// Category that was already registered
        category: String,
    },

    /// Empty category name
    #[error("partition category must not be empty")]
    EmptyCategory,

    /// Address is not `host:port`
    #[error("invalid address '{address}' for category '{category}': expected host:port")]
    InvalidAddress {
        /// Category being registered
        category: String,
        /// Offending address
        address: String,
    },

    /// More partitions than `PartitionId` can index
    #[error("too many partitions (max {max})")]
    TooManyPartitions {
        /// Maximum supported partition count
        max: usize,
    },
}

impl RoutingError {
    #[inline]
    pub fn unknown_category(category: impl Into<String>) -> Self {
        Self::UnknownCategory {
            category: category.into(),
        }
    }

    #[inline]
    pub fn duplicate_category(category: impl Into<String>) -> Self {
        Self::DuplicateCategory {
            category: category.into(),
        }
    }

    #[inline]
    pub fn invalid_address(category: impl Into<String>, address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            category: category.into(),
            address: address.into(),
        }
    }
}
