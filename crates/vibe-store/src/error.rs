//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the remote media store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to configure store client: {0}")]
    ConfigError(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Store renamed resource: requested '{requested}', got '{returned}'")]
    IdentifierMismatch { requested: String, returned: String },

    #[error("Retrieval failed with status {status} for {url}")]
    RetrievalFailed { status: u16, url: String },

    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl StoreError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn publish_failed(msg: impl Into<String>) -> Self {
        Self::PublishFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Status code of a failed retrieval, if that is what this error is.
    pub fn retrieval_status(&self) -> Option<u16> {
        match self {
            Self::RetrievalFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
