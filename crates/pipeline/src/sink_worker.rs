//! Sink workers
//!
//! One worker per partition drains that partition's queue into a single
//! `SinkClient`. Requests to one backend are therefore never concurrent.

use std::sync::Arc;

use memc_protocol::Payload;
use memc_routing::Partition;
use memc_sinks::{RateLimitedLogger, SinkClient};
use tokio::sync::mpsc;

use crate::stats::StatsAggregator;

/// Outcome of one sink worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkWorkerSnapshot {
    pub category: String,
    pub address: String,
    pub written: u64,
    pub failed: u64,
}

/// Drains one partition queue into its backend
pub struct SinkWorker {
    partition: Partition,
    queue: mpsc::Receiver<Payload>,
    client: Box<dyn SinkClient>,
    stats: Arc<StatsAggregator>,
    errors: RateLimitedLogger,
}

impl SinkWorker {
    pub fn new(
        partition: Partition,
        queue: mpsc::Receiver<Payload>,
        client: Box<dyn SinkClient>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        let errors = RateLimitedLogger::with_default_interval(partition.address.clone());
        Self {
            partition,
            queue,
            client,
            stats,
            errors,
        }
    }

    /// Write payloads until every sender of the queue is gone
    pub async fn run(mut self) -> SinkWorkerSnapshot {
        let mut written = 0u64;
        let mut failed = 0u64;

        while let Some(payload) = self.queue.recv().await {
            match self.client.set(&payload.key, &payload.value).await {
                Ok(()) => {
                    self.stats.record_processed();
                    written += 1;
                }
                Err(e) => {
                    self.stats.record_sink_error();
                    self.errors.error(&payload.key, &e);
                    failed += 1;
                }
            }
        }

        tracing::debug!(
            category = %self.partition.category,
            address = %self.client.address(),
            written,
            failed,
            "sink worker finished"
        );

        SinkWorkerSnapshot {
            category: self.partition.category,
            address: self.partition.address,
            written,
            failed,
        }
    }
}

impl std::fmt::Debug for SinkWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkWorker")
            .field("category", &self.partition.category)
            .field("address", &self.partition.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use memc_protocol::Bytes;
    use memc_routing::PartitionId;
    use memc_sinks::SinkError;
    use parking_lot::Mutex;

    struct FlakyClient {
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SinkClient for FlakyClient {
        async fn set(&mut self, key: &str, _value: &[u8]) -> Result<(), SinkError> {
            self.seen.lock().push(key.to_string());
            if key.ends_with("bad") {
                Err(SinkError::rejected("SERVER_ERROR out of memory"))
            } else {
                Ok(())
            }
        }

        fn address(&self) -> &str {
            "127.0.0.1:33013"
        }
    }

    fn partition() -> Partition {
        Partition {
            id: PartitionId::new(0),
            category: "idfa".into(),
            address: "127.0.0.1:33013".into(),
        }
    }

    #[tokio::test]
    async fn test_sink_worker_counts_writes_and_failures() {
        let (tx, rx) = mpsc::channel(8);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stats = Arc::new(StatsAggregator::new());
        let client = Box::new(FlakyClient {
            seen: Arc::clone(&seen),
        });

        for key in ["idfa:1", "idfa:bad", "idfa:2"] {
            tx.send(Payload {
                key: key.into(),
                value: Bytes::from_static(b"v"),
            })
            .await
            .unwrap();
        }
        drop(tx);

        let snapshot = SinkWorker::new(partition(), rx, client, Arc::clone(&stats))
            .run()
            .await;

        assert_eq!(snapshot.category, "idfa");
        assert_eq!(snapshot.written, 2);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(*seen.lock(), vec!["idfa:1", "idfa:bad", "idfa:2"]);

        let run = stats.snapshot();
        assert_eq!(run.processed, 2);
        assert_eq!(run.sink_errors, 1);
    }

    #[tokio::test]
    async fn test_sink_worker_exits_on_empty_closed_queue() {
        let (tx, rx) = mpsc::channel::<Payload>(1);
        drop(tx);
        let client = Box::new(FlakyClient {
            seen: Arc::new(Mutex::new(Vec::new())),
        });

        let snapshot = SinkWorker::new(partition(), rx, client, Arc::new(StatsAggregator::new()))
            .run()
            .await;
        assert_eq!(snapshot.written, 0);
        assert_eq!(snapshot.failed, 0);
    }
}
