//! Partition router
//!
//! Maps a record's category to the queue of the partition that stores it.
//! The category lookup goes through the immutable `PartitionTable`; handles
//! live in a `Vec<Option<PartitionHandle>>` indexed by `PartitionId`.

use std::sync::Arc;

use memc_protocol::Payload;
use memc_routing::{Partition, PartitionTable, RoutingError};
use tokio::sync::mpsc;

use crate::partition_handle::PartitionHandle;

/// Category to partition-queue router
///
/// Shared read-only by every ingestion worker of a run. Dropping the last
/// `Arc<PartitionRouter>` closes every partition queue.
pub struct PartitionRouter {
    table: Arc<PartitionTable>,
    partitions: Vec<Option<PartitionHandle>>,
}

impl PartitionRouter {
    /// Create a router with no registered handles
    pub(crate) fn new(table: Arc<PartitionTable>) -> Self {
        let partitions = (0..table.len()).map(|_| None).collect();
        Self { table, partitions }
    }

    /// Create a router with one bounded queue per partition
    ///
    /// Returns the router together with each partition and the receiving
    /// half of its queue, in table order.
    pub fn with_channels(
        table: Arc<PartitionTable>,
        queue_size: usize,
    ) -> (Self, Vec<(Partition, mpsc::Receiver<Payload>)>) {
        let mut router = Self::new(Arc::clone(&table));
        let mut receivers = Vec::with_capacity(table.len());

        for partition in table.iter() {
            let (tx, rx) = mpsc::channel(queue_size.max(1));
            router.register(PartitionHandle::new(partition.id, partition.category.clone(), tx));
            receivers.push((partition.clone(), rx));
        }

        (router, receivers)
    }

    /// Register a partition handle, replacing any previous one with the same id
    pub(crate) fn register(&mut self, handle: PartitionHandle) {
        let index = handle.id().as_usize();
        if index >= self.partitions.len() {
            self.partitions.resize_with(index + 1, || None);
        }
        self.partitions[index] = Some(handle);
    }

    /// Find the handle for a category
    ///
    /// Categories are matched exactly. A category present in the table but
    /// without a registered handle is reported the same as an unknown one.
    pub fn route(&self, category: &str) -> Result<&PartitionHandle, RoutingError> {
        let id = self.table.lookup(category)?;
        self.partitions
            .get(id.as_usize())
            .and_then(Option::as_ref)
            .ok_or_else(|| RoutingError::unknown_category(category))
    }

    /// Number of registered handles
    pub fn partition_count(&self) -> usize {
        self.partitions.iter().filter(|p| p.is_some()).count()
    }
}

impl std::fmt::Debug for PartitionRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionRouter")
            .field("table_len", &self.table.len())
            .field("partition_count", &self.partition_count())
            .finish()
    }
}
