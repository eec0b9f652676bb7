//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Planner error: {0}")]
    Planner(#[from] dclip_planner::PlannerError),

    #[error("Source error: {0}")]
    Source(#[from] dclip_sources::SourceError),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Compilation short by {missing_seconds:.1}s and {missing_count} clip(s)")]
    ShortfallRejected {
        missing_seconds: f64,
        missing_count: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Check if a later run could succeed without any change to the setup.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::Source(e) => e.is_retryable(),
            WorkerError::ShortfallRejected { .. } | WorkerError::Io(_) => true,
            _ => false,
        }
    }
}
