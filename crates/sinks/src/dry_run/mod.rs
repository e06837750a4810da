//! Dry-run sink client
//!
//! Logs what would have been stored and reports success. Used by
//! `--dry` runs to validate input without a memcached fleet.

use async_trait::async_trait;
use memc_protocol::codec;

use crate::{SinkClient, SinkError};

/// Log-only client
#[derive(Debug, Clone)]
pub struct DryRunClient {
    address: String,
    sets: u64,
}

impl DryRunClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            sets: 0,
        }
    }

    /// Number of `set` calls seen
    pub fn sets(&self) -> u64 {
        self.sets
    }
}

#[async_trait]
impl SinkClient for DryRunClient {
    async fn set(&mut self, key: &str, value: &[u8]) -> Result<(), SinkError> {
        self.sets += 1;
        match codec::decode(key, value) {
            Ok(record) => {
                tracing::debug!(address = %self.address, key = %key, record = %record, "dry run set");
            }
            Err(e) => {
                tracing::debug!(
                    address = %self.address,
                    key = %key,
                    bytes = value.len(),
                    error = %e,
                    "dry run set (undecodable value)"
                );
            }
        }
        Ok(())
    }

    fn address(&self) -> &str {
        &self.address
    }
}
