//! Source adapter error types.

use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid source configuration: {0}")]
    InvalidConfig(String),

    #[error("Catalog unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SourceError::ServiceUnavailable(_) | SourceError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(SourceError::ServiceUnavailable("503".into()).is_retryable());
        assert!(!SourceError::RequestFailed("400".into()).is_retryable());
        assert!(!SourceError::invalid_config("no client id").is_retryable());
    }
}
