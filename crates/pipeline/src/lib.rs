//! memc-load Pipeline
//!
//! Moves the lines of one gzip file through two worker pools into the
//! partitioned key-value store.
//!
//! # Architecture
//!
//! ```text
//!                     ┌──→ [ingest 0] ──┐        ┌──→ idfa queue ──→ [sink] ──→ memcached :33013
//! [reader] ──→ lines ─┼──→ [ingest 1] ──┼─route──┼──→ gaid queue ──→ [sink] ──→ memcached :33014
//!                     └──→ [ingest N] ──┘        └──→ ...
//! ```
//!
//! - **Bounded queues**: full queues suspend the producer, so memory stays flat
//! - **One writer per backend**: each partition queue has exactly one sink worker
//! - **Atomic stats**: `StatsAggregator` is the only shared mutable state
//! - **Closure-driven shutdown**: no cancellation; a run ends when its queues drain
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use memc_pipeline::{Pipeline, PipelineConfig};
//! use memc_routing::PartitionTable;
//! use memc_sinks::DryRunConnector;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let table = PartitionTable::from_pairs([("idfa", "127.0.0.1:33013")])?;
//! let pipeline = Pipeline::new(PipelineConfig::default(), Arc::new(table), Arc::new(DryRunConnector));
//!
//! let report = pipeline.run_file(Path::new("/data/appsinstalled/20170929000000.tsv.gz")).await;
//! report.log();
//! # Ok(())
//! # }
//! ```

mod error;
mod ingest;
mod orchestrator;
mod partition_handle;
mod router;
mod sink_worker;
mod stats;

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

pub use error::{PipelineError, Result};
pub use ingest::{IngestSnapshot, IngestWorker};
pub use orchestrator::{
    DEFAULT_QUEUE_SIZE, DEFAULT_WORKERS, FileReport, FileState, Pipeline, PipelineConfig,
};
pub use partition_handle::PartitionHandle;
pub use router::PartitionRouter;
pub use sink_worker::{SinkWorker, SinkWorkerSnapshot};
pub use stats::{NORMAL_ERROR_RATE, RunStats, StatsAggregator, Verdict};
