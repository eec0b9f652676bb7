//! Planner error types.

use thiserror::Error;

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Errors raised by the planning engine.
///
/// Only configuration problems and corrupted plans are errors. Bad candidates,
/// empty pools and missed thresholds are reported as data.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid title pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Inconsistent offset at entry {index}: stored {stored}s, expected {expected}s")]
    InconsistentOffsets {
        index: usize,
        stored: f64,
        expected: f64,
    },

    #[error("Inconsistent plan total: stored {stored}s, expected {expected}s")]
    InconsistentTotal { stored: f64, expected: f64 },
}

impl PlannerError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Check if the error was caused by configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PlannerError::InvalidConfig(_) | PlannerError::InvalidPattern { .. }
        )
    }
}

impl From<validator::ValidationErrors> for PlannerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(errors.to_string())
    }
}
