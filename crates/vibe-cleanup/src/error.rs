//! Cleanup client error types.

use thiserror::Error;

pub type CleanupResult<T> = Result<T, CleanupError>;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Cleanup client not configured: {0}")]
    ConfigError(String),

    #[error("Cleanup service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Edit failed on the service side: {0}")]
    EditFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out waiting for edit after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CleanupError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CleanupError::ServiceUnavailable(_) | CleanupError::Network(_)
        )
    }
}
