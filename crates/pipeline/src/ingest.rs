//! Ingestion workers
//!
//! Each worker pulls raw lines from the shared line queue, parses them, and
//! pushes the encoded payload onto the queue of the record's partition.
//! Per-line failures are counted and logged; they never stop the worker.

use std::sync::Arc;

use crossfire::MAsyncRx;
use memc_protocol::{AppIdPolicy, Payload, parse_line_with};

use crate::router::PartitionRouter;
use crate::stats::StatsAggregator;

/// Counters for one ingestion worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSnapshot {
    pub lines: u64,
    pub routed: u64,
    pub parse_errors: u64,
    pub routing_errors: u64,
    pub queue_errors: u64,
}

/// Parse-and-route worker
pub struct IngestWorker {
    id: usize,
    lines: MAsyncRx<String>,
    router: Arc<PartitionRouter>,
    stats: Arc<StatsAggregator>,
    policy: AppIdPolicy,
}

impl IngestWorker {
    pub fn new(
        id: usize,
        lines: MAsyncRx<String>,
        router: Arc<PartitionRouter>,
        stats: Arc<StatsAggregator>,
        policy: AppIdPolicy,
    ) -> Self {
        Self {
            id,
            lines,
            router,
            stats,
            policy,
        }
    }

    /// Process lines until the line queue is closed and drained
    pub async fn run(self) -> IngestSnapshot {
        let mut snapshot = IngestSnapshot::default();

        while let Ok(line) = self.lines.recv().await {
            snapshot.lines += 1;
            self.process(&line, &mut snapshot).await;
        }

        tracing::debug!(
            worker = self.id,
            lines = snapshot.lines,
            routed = snapshot.routed,
            parse_errors = snapshot.parse_errors,
            routing_errors = snapshot.routing_errors,
            queue_errors = snapshot.queue_errors,
            "ingest worker finished"
        );

        snapshot
    }

    async fn process(&self, line: &str, snapshot: &mut IngestSnapshot) {
        let record = match parse_line_with(line, self.policy) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(worker = self.id, kind = e.kind(), error = %e, "skipping malformed line");
                self.stats.record_parse_error();
                snapshot.parse_errors += 1;
                return;
            }
        };

        let handle = match self.router.route(&record.category) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(worker = self.id, category = %record.category, error = %e, "unknown device type");
                self.stats.record_routing_error();
                snapshot.routing_errors += 1;
                return;
            }
        };

        let payload = Payload::from_record(&record);
        if let Err(payload) = handle.send(payload).await {
            tracing::error!(
                worker = self.id,
                partition = %handle.id(),
                category = handle.category(),
                key = %payload.key,
                "partition queue closed"
            );
            self.stats.record_sink_error();
            snapshot.queue_errors += 1;
            return;
        }

        snapshot.routed += 1;
    }
}

impl std::fmt::Debug for IngestWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestWorker")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memc_protocol::codec;
    use memc_routing::PartitionTable;

    fn table() -> Arc<PartitionTable> {
        Arc::new(
            PartitionTable::from_pairs([("idfa", "127.0.0.1:1"), ("gaid", "127.0.0.1:2")]).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_worker_routes_and_counts() {
        let (router, mut receivers) = PartitionRouter::with_channels(table(), 16);
        let stats = Arc::new(StatsAggregator::new());
        let (tx, rx) = crossfire::mpmc::bounded_tx_blocking_rx_async::<String>(16);

        for line in [
            "idfa\tdev1\t1.0\t2.0\t1,2",
            "gaid\tdev2\t3.0\t4.0\t3",
            "dvid\tdev3\t1.0\t2.0\t1",
            "garbage",
        ] {
            tx.send(line.to_string()).unwrap();
        }
        drop(tx);

        let worker = IngestWorker::new(0, rx, Arc::new(router), Arc::clone(&stats), AppIdPolicy::Lenient);
        let snapshot = worker.run().await;

        assert_eq!(
            snapshot,
            IngestSnapshot {
                lines: 4,
                routed: 2,
                parse_errors: 1,
                routing_errors: 1,
                queue_errors: 0,
            }
        );

        let run = stats.snapshot();
        assert_eq!(run.processed, 0);
        assert_eq!(run.errors, 2);

        let (_, idfa_rx) = &mut receivers[0];
        let payload = idfa_rx.recv().await.unwrap();
        assert_eq!(payload.key, "idfa:dev1");
        assert_eq!(codec::decode_value(&payload.value).unwrap().apps, vec![1, 2]);

        let (_, gaid_rx) = &mut receivers[1];
        assert_eq!(gaid_rx.recv().await.unwrap().key, "gaid:dev2");
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_bad_app_id() {
        let (router, _receivers) = PartitionRouter::with_channels(table(), 16);
        let stats = Arc::new(StatsAggregator::new());
        let (tx, rx) = crossfire::mpmc::bounded_tx_blocking_rx_async::<String>(4);

        tx.send("idfa\tdev\t1\t2\t1,x".to_string()).unwrap();
        drop(tx);

        let worker = IngestWorker::new(0, rx, Arc::new(router), Arc::clone(&stats), AppIdPolicy::Strict);
        let snapshot = worker.run().await;

        assert_eq!(snapshot.parse_errors, 1);
        assert_eq!(stats.snapshot().parse_errors, 1);
    }

    #[tokio::test]
    async fn test_closed_partition_queue_counts_as_sink_error() {
        let (router, receivers) = PartitionRouter::with_channels(table(), 16);
        drop(receivers);
        let stats = Arc::new(StatsAggregator::new());
        let (tx, rx) = crossfire::mpmc::bounded_tx_blocking_rx_async::<String>(4);

        tx.send("idfa\tdev\t1\t2\t1".to_string()).unwrap();
        drop(tx);

        let worker = IngestWorker::new(3, rx, Arc::new(router), Arc::clone(&stats), AppIdPolicy::Lenient);
        let snapshot = worker.run().await;

        assert_eq!(snapshot.queue_errors, 1);
        assert_eq!(stats.snapshot().sink_errors, 1);
    }
}
