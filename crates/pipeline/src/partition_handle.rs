//! Partition handle for pipeline communication
//!
//! `PartitionHandle` wraps the sending side of one partition queue, allowing
//! ingestion workers to hand payloads to a sink worker without knowing which
//! client sits behind it.

use memc_protocol::Payload;
use memc_routing::PartitionId;
use tokio::sync::mpsc;

/// Handle to one partition's bounded queue
///
/// Cloning the sender is cheap; the queue closes once every handle (and so
/// every clone of the sender) has been dropped.
pub struct PartitionHandle {
    /// Partition index in the table
    id: PartitionId,

    /// Category served by the partition
    category: String,

    /// Sender half of the partition queue
    sender: mpsc::Sender<Payload>,
}

impl PartitionHandle {
    #[inline]
    pub(crate) fn new(id: PartitionId, category: impl Into<String>, sender: mpsc::Sender<Payload>) -> Self {
        Self {
            id,
            category: category.into(),
            sender,
        }
    }

    #[inline]
    pub fn id(&self) -> PartitionId {
        self.id
    }

    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Send a payload, waiting while the queue is full
    ///
    /// Returns the payload back if the sink worker has gone away.
    #[inline]
    pub async fn send(&self, payload: Payload) -> Result<(), Payload> {
        self.sender.send(payload).await.map_err(|e| e.0)
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots in the queue
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    #[inline]
    pub(crate) fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

impl std::fmt::Debug for PartitionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionHandle")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("capacity", &self.capacity())
            .field("max_capacity", &self.max_capacity())
            .field("closed", &self.is_closed())
            .finish()
    }
}
