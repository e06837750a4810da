//! Run statistics
//!
//! Atomic counters shared by every worker of one file run. All operations
//! use relaxed ordering; totals are read once, after every worker has been
//! joined.

use std::fmt;
use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

/// Error rate below which a load counts as successful
pub const NORMAL_ERROR_RATE: f64 = 0.01;

/// Shared accumulator of processed and failed records
///
/// Workers only ever increment; nobody else writes the counters.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    /// Records stored by a sink
    processed: AtomicU64,

    /// Lines the parser rejected
    parse_errors: AtomicU64,

    /// Records whose category has no partition
    routing_errors: AtomicU64,

    /// Failed sink writes and closed partition queues
    sink_errors: AtomicU64,
}

impl StatsAggregator {
    #[inline]
    pub const fn new() -> Self {
        Self {
            processed: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
            routing_errors: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_routing_error(&self) {
        self.routing_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sink_error(&self) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> RunStats {
        let parse_errors = self.parse_errors.load(Ordering::Relaxed);
        let routing_errors = self.routing_errors.load(Ordering::Relaxed);
        let sink_errors = self.sink_errors.load(Ordering::Relaxed);

        RunStats {
            processed: self.processed.load(Ordering::Relaxed),
            errors: parse_errors + routing_errors + sink_errors,
            parse_errors,
            routing_errors,
            sink_errors,
        }
    }

    #[inline]
    pub fn error_rate(&self) -> Option<f64> {
        self.snapshot().error_rate()
    }

    #[inline]
    pub fn verdict(&self) -> Verdict {
        self.snapshot().verdict()
    }
}

/// Final counters of a run
///
/// `errors` always equals the sum of the per-stage breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub processed: u64,
    pub errors: u64,
    pub parse_errors: u64,
    pub routing_errors: u64,
    pub sink_errors: u64,
}

impl RunStats {
    /// `errors / processed`, or `None` when nothing was processed
    #[inline]
    pub fn error_rate(&self) -> Option<f64> {
        if self.processed == 0 {
            None
        } else {
            Some(self.errors as f64 / self.processed as f64)
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self.error_rate() {
            Some(rate) if rate < NORMAL_ERROR_RATE => Verdict::Acceptable,
            Some(_) => Verdict::Failed,
            None if self.errors > 0 => Verdict::Failed,
            None => Verdict::NoRecords,
        }
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.errors += other.errors;
        self.parse_errors += other.parse_errors;
        self.routing_errors += other.routing_errors;
        self.sink_errors += other.sink_errors;
    }
}

/// Outcome of comparing the error rate with `NORMAL_ERROR_RATE`
///
/// Advisory only: a failed verdict is logged, never turned into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Acceptable,
    Failed,
    NoRecords,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Acceptable => "acceptable",
            Self::Failed => "failed",
            Self::NoRecords => "no records",
        })
    }
}
