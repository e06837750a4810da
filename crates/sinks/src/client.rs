//! Sink client and connector traits

use async_trait::async_trait;
use memc_routing::Partition;

use crate::dry_run::DryRunClient;
use crate::memcache::MemcacheClient;
use crate::{SinkError, SinkOptions};

/// Key-value store connection owned by one partition's sink worker
#[async_trait]
pub trait SinkClient: Send {
    /// Store `value` under `key`
    async fn set(&mut self, key: &str, value: &[u8]) -> Result<(), SinkError>;

    /// Server address this client writes to
    fn address(&self) -> &str;
}

/// Factory for per-partition clients
///
/// Called once per partition per file run.
pub trait SinkConnector: Send + Sync {
    fn connect(&self, partition: &Partition) -> Box<dyn SinkClient>;
}

/// Connects to real memcached servers
#[derive(Debug, Clone, Default)]
pub struct MemcacheConnector {
    options: SinkOptions,
}

impl MemcacheConnector {
    pub fn new(options: SinkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SinkOptions {
        &self.options
    }
}

impl SinkConnector for MemcacheConnector {
    fn connect(&self, partition: &Partition) -> Box<dyn SinkClient> {
        Box::new(MemcacheClient::new(partition.address.clone(), self.options))
    }
}

/// Builds log-only clients that never touch the network
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunConnector;

impl SinkConnector for DryRunConnector {
    fn connect(&self, partition: &Partition) -> Box<dyn SinkClient> {
        Box::new(DryRunClient::new(partition.address.clone()))
    }
}
