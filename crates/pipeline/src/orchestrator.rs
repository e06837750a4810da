//! Per-file pipeline orchestration
//!
//! `Pipeline::run_file` wires one gzip file through the worker pools:
//!
//! ```text
//! [reader thread] ──→ line queue ──→ [ingest × N] ──→ partition queues ──→ [sink × P]
//!   GzipLines        crossfire MPMC     parse+route      tokio mpsc          SinkClient
//! ```
//!
//! Shutdown is driven purely by queue closure: the reader drops the line
//! sender at end of input, the ingest workers exit once the line queue is
//! drained, and dropping the router then closes every partition queue.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossfire::MTx;
use memc_protocol::AppIdPolicy;
use memc_routing::PartitionTable;
use memc_sinks::SinkConnector;
use memc_sources::{FileError, GzipLines};

use crate::error::PipelineError;
use crate::ingest::{IngestSnapshot, IngestWorker};
use crate::router::PartitionRouter;
use crate::sink_worker::{SinkWorker, SinkWorkerSnapshot};
use crate::stats::{NORMAL_ERROR_RATE, RunStats, StatsAggregator, Verdict};

/// Default number of ingestion workers
pub const DEFAULT_WORKERS: usize = 5;

/// Default capacity of the line queue and of each partition queue
pub const DEFAULT_QUEUE_SIZE: usize = 10;

/// Worker pool sizing and parsing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub workers: usize,
    pub queue_size: usize,
    pub app_id_policy: AppIdPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_size: DEFAULT_QUEUE_SIZE,
            app_id_policy: AppIdPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    pub fn with_app_id_policy(mut self, policy: AppIdPolicy) -> Self {
        self.app_id_policy = policy;
        self
    }
}

/// Stage of a single file run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Opening,
    Streaming,
    DrainingIngest,
    DrainingSinks,
    Reporting,
    Done,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Opening => "opening",
            Self::Streaming => "streaming",
            Self::DrainingIngest => "draining_ingest",
            Self::DrainingSinks => "draining_sinks",
            Self::Reporting => "reporting",
            Self::Done => "done",
        })
    }
}

/// Everything known about one file run once it is done
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub stats: RunStats,
    pub verdict: Verdict,
    pub partitions: Vec<SinkWorkerSnapshot>,
    pub workers: Vec<IngestSnapshot>,
    /// Lines handed to the ingestion queue
    pub lines: u64,
    /// The file could not be opened; nothing was processed
    pub open_error: Option<FileError>,
    /// Reading stopped early; lines read before the failure were processed
    pub stream_error: Option<FileError>,
    pub task_errors: Vec<PipelineError>,
    /// States the run went through, in order
    pub states: Vec<FileState>,
    pub elapsed: Duration,
}

impl FileReport {
    fn unopened(path: PathBuf, error: FileError, states: Vec<FileState>, elapsed: Duration) -> Self {
        Self {
            path,
            stats: RunStats::default(),
            verdict: Verdict::NoRecords,
            partitions: Vec::new(),
            workers: Vec::new(),
            lines: 0,
            open_error: Some(error),
            stream_error: None,
            task_errors: Vec::new(),
            states,
            elapsed,
        }
    }

    #[inline]
    pub fn error_rate(&self) -> Option<f64> {
        self.stats.error_rate()
    }

    /// Whether the file was read to the end without a worker failing
    pub fn is_complete(&self) -> bool {
        self.open_error.is_none() && self.stream_error.is_none() && self.task_errors.is_empty()
    }

    /// Log the per-partition results and the file verdict
    pub fn log(&self) {
        let file = self.path.display();

        if let Some(e) = &self.open_error {
            tracing::error!(file = %file, error = %e, "could not open file");
            return;
        }
        if let Some(e) = &self.stream_error {
            tracing::error!(file = %file, error = %e, lines = self.lines, "file read stopped early");
        }
        for e in &self.task_errors {
            tracing::error!(file = %file, error = %e, "worker task failed");
        }

        for partition in &self.partitions {
            tracing::info!(
                file = %file,
                category = %partition.category,
                address = %partition.address,
                written = partition.written,
                failed = partition.failed,
                "partition summary"
            );
        }

        let s = &self.stats;
        let elapsed_ms = self.elapsed.as_millis() as u64;
        match (self.verdict, self.error_rate()) {
            (Verdict::Acceptable, Some(rate)) => tracing::info!(
                file = %file,
                processed = s.processed,
                errors = s.errors,
                parse_errors = s.parse_errors,
                routing_errors = s.routing_errors,
                sink_errors = s.sink_errors,
                error_rate = rate,
                elapsed_ms,
                "acceptable error rate, successful load"
            ),
            (_, rate) if s.errors > 0 => tracing::error!(
                file = %file,
                processed = s.processed,
                errors = s.errors,
                parse_errors = s.parse_errors,
                routing_errors = s.routing_errors,
                sink_errors = s.sink_errors,
                error_rate = ?rate,
                threshold = NORMAL_ERROR_RATE,
                elapsed_ms,
                "high error rate, failed load"
            ),
            _ => tracing::info!(file = %file, elapsed_ms, "no records loaded"),
        }
    }
}

/// Outcome of the reader thread
#[derive(Debug, Default)]
struct StreamSummary {
    lines: u64,
    error: Option<FileError>,
}

/// Push every line of the file onto the ingestion queue
///
/// Runs on a blocking thread. Dropping `tx` on return closes the queue.
fn stream_lines(lines: GzipLines, tx: MTx<String>) -> StreamSummary {
    let mut summary = StreamSummary::default();

    for line in lines {
        match line {
            Ok(line) => {
                if tx.send(line).is_err() {
                    tracing::warn!("line queue closed before end of file");
                    break;
                }
                summary.lines += 1;
            }
            Err(e) => {
                summary.error = Some(e);
                break;
            }
        }
    }

    summary
}

/// Loads files through the worker pools, one file at a time
pub struct Pipeline {
    config: PipelineConfig,
    table: Arc<PartitionTable>,
    connector: Arc<dyn SinkConnector>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        table: Arc<PartitionTable>,
        connector: Arc<dyn SinkConnector>,
    ) -> Self {
        Self {
            config,
            table,
            connector,
        }
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    pub fn table(&self) -> &PartitionTable {
        &self.table
    }

    /// Load one gzip file
    ///
    /// Never fails as a whole: open, read and worker failures are recorded
    /// in the returned report alongside whatever was processed.
    pub async fn run_file(&self, path: &Path) -> FileReport {
        let started = Instant::now();
        let file = path.display().to_string();
        let workers = self.config.workers.max(1);
        let queue_size = self.config.queue_size.max(1);

        let mut states = Vec::with_capacity(6);
        transition(&file, &mut states, FileState::Opening);
        let open_path = path.to_path_buf();
        let opened = tokio::task::spawn_blocking(move || GzipLines::open(open_path)).await;
        let lines = match opened {
            Ok(Ok(lines)) => lines,
            Ok(Err(e)) => {
                transition(&file, &mut states, FileState::Done);
                return FileReport::unopened(path.to_path_buf(), e, states, started.elapsed());
            }
            Err(e) => {
                let error = FileError::open(path, std::io::Error::other(e.to_string()));
                transition(&file, &mut states, FileState::Done);
                return FileReport::unopened(path.to_path_buf(), error, states, started.elapsed());
            }
        };

        let stats = Arc::new(StatsAggregator::new());
        let mut task_errors = Vec::new();

        let (router, receivers) = PartitionRouter::with_channels(Arc::clone(&self.table), queue_size);
        let sink_handles: Vec<_> = receivers
            .into_iter()
            .map(|(partition, queue)| {
                let client = self.connector.connect(&partition);
                let worker = SinkWorker::new(partition, queue, client, Arc::clone(&stats));
                tokio::spawn(worker.run())
            })
            .collect();

        let router = Arc::new(router);
        let (line_tx, line_rx) = crossfire::mpmc::bounded_tx_blocking_rx_async::<String>(queue_size);
        let ingest_handles: Vec<_> = (0..workers)
            .map(|id| {
                let worker = IngestWorker::new(
                    id,
                    line_rx.clone(),
                    Arc::clone(&router),
                    Arc::clone(&stats),
                    self.config.app_id_policy,
                );
                tokio::spawn(worker.run())
            })
            .collect();
        drop(line_rx);

        transition(&file, &mut states, FileState::Streaming);
        let reader = tokio::task::spawn_blocking(move || stream_lines(lines, line_tx));
        let summary = match reader.await {
            Ok(summary) => summary,
            Err(e) => {
                task_errors.push(PipelineError::task_failed("reader", e));
                StreamSummary::default()
            }
        };

        // The reader has dropped the line sender; workers drain what is left
        transition(&file, &mut states, FileState::DrainingIngest);

        let mut worker_snapshots = Vec::with_capacity(workers);
        for handle in ingest_handles {
            match handle.await {
                Ok(snapshot) => worker_snapshots.push(snapshot),
                Err(e) => task_errors.push(PipelineError::task_failed("ingest", e)),
            }
        }
        drop(router);

        transition(&file, &mut states, FileState::DrainingSinks);
        let mut partitions = Vec::with_capacity(sink_handles.len());
        for handle in sink_handles {
            match handle.await {
                Ok(snapshot) => partitions.push(snapshot),
                Err(e) => task_errors.push(PipelineError::task_failed("sink", e)),
            }
        }

        transition(&file, &mut states, FileState::Reporting);
        let stats = stats.snapshot();
        let verdict = stats.verdict();

        transition(&file, &mut states, FileState::Done);
        FileReport {
            path: path.to_path_buf(),
            stats,
            verdict,
            partitions,
            workers: worker_snapshots,
            lines: summary.lines,
            open_error: None,
            stream_error: summary.error,
            task_errors,
            states,
            elapsed: started.elapsed(),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("partitions", &self.table.len())
            .finish()
    }
}

#[inline]
fn transition(file: &str, states: &mut Vec<FileState>, state: FileState) {
    tracing::debug!(file = %file, state = %state, "file state");
    states.push(state);
}
