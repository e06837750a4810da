//! Pipeline error types

use thiserror::Error;
use tokio::task::JoinError;

/// Pipeline errors
///
/// Per-record failures never surface here; they are counted in `RunStats`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A spawned worker panicked or was cancelled
    #[error("{role} task failed: {source}")]
    TaskFailed {
        role: &'static str,
        #[source]
        source: JoinError,
    },
}

impl PipelineError {
    #[inline]
    pub fn task_failed(role: &'static str, source: JoinError) -> Self {
        Self::TaskFailed { role, source }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
