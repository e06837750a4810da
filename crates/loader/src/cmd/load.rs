//! Load command - Run every matching file through the pipeline
//!
//! Files are loaded one at a time in path order. Each finished file is
//! renamed to its dot-prefixed processed name whatever its verdict, so a
//! rerun never loads it twice.

use std::sync::Arc;

use anyhow::{Context, Result};
use memc_config::{Config, SinkConfig};
use memc_pipeline::{FileReport, NORMAL_ERROR_RATE, Pipeline, PipelineConfig, RunStats, Verdict};
use memc_protocol::AppIdPolicy;
use memc_sinks::{DryRunConnector, MemcacheConnector, SinkConnector, SinkOptions};
use memc_sources::{discover_files, mark_processed};
use tracing::{error, info, warn};

/// Totals across every file of one invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub files: usize,
    /// Files that could not be opened or were not read to the end
    pub incomplete: usize,
    pub stats: RunStats,
}

impl BatchSummary {
    pub fn add(&mut self, report: &FileReport) {
        self.files += 1;
        if !report.is_complete() {
            self.incomplete += 1;
        }
        self.stats += report.stats;
    }

    #[inline]
    pub fn verdict(&self) -> Verdict {
        self.stats.verdict()
    }

    pub fn log(&self) {
        let s = &self.stats;
        match (self.verdict(), s.error_rate()) {
            (Verdict::Acceptable, Some(rate)) => info!(
                files = self.files,
                incomplete = self.incomplete,
                processed = s.processed,
                errors = s.errors,
                error_rate = rate,
                "Acceptable error rate ({}). Successful load",
                rate
            ),
            (Verdict::NoRecords, _) => info!(
                files = self.files,
                incomplete = self.incomplete,
                "No records loaded"
            ),
            (_, rate) => error!(
                files = self.files,
                incomplete = self.incomplete,
                processed = s.processed,
                errors = s.errors,
                error_rate = ?rate,
                "High error rate ({} > {}). Failed load",
                rate.map_or_else(|| "n/a".to_string(), |r| r.to_string()),
                NORMAL_ERROR_RATE
            ),
        }
    }
}

/// Sink client settings from the `[sink]` section
pub fn sink_options(config: &SinkConfig) -> SinkOptions {
    SinkOptions::default()
        .with_connect_timeout(config.connect_timeout)
        .with_io_timeout(config.io_timeout)
        .with_retry_attempts(config.retry_attempts)
        .with_retry_interval(config.retry_interval)
}

/// Run the load command
pub async fn run(config: Config, strict_app_ids: bool) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        pattern = %config.global.pattern,
        workers = config.global.workers,
        queue_size = config.global.queue_size,
        dry_run = config.global.dry_run,
        "memc-load starting"
    );

    let summary = load_all(&config, strict_app_ids).await?;
    summary.log();
    Ok(())
}

/// Load every file matching the configured pattern
pub async fn load_all(config: &Config, strict_app_ids: bool) -> Result<BatchSummary> {
    let table = Arc::new(
        config
            .partitions
            .to_table()
            .context("invalid partition configuration")?,
    );
    for partition in table.iter() {
        info!(category = %partition.category, address = %partition.address, "partition");
    }

    let connector: Arc<dyn SinkConnector> = if config.global.dry_run {
        Arc::new(DryRunConnector)
    } else {
        Arc::new(MemcacheConnector::new(sink_options(&config.sink)))
    };

    let policy = if strict_app_ids {
        AppIdPolicy::Strict
    } else {
        AppIdPolicy::Lenient
    };
    let pipeline_config = PipelineConfig::default()
        .with_workers(config.global.workers)
        .with_queue_size(config.global.queue_size)
        .with_app_id_policy(policy);
    let pipeline = Pipeline::new(pipeline_config, table, connector);

    let files = discover_files(&config.global.pattern).context("invalid file pattern")?;
    if files.is_empty() {
        warn!(pattern = %config.global.pattern, "no files matched");
    }

    let mut summary = BatchSummary::default();
    for path in &files {
        info!(file = %path.display(), "processing");
        let report = pipeline.run_file(path).await;
        report.log();
        summary.add(&report);

        if let Err(e) = mark_processed(path) {
            error!(file = %path.display(), error = %e, "could not mark file as processed");
        }
    }

    Ok(summary)
}
