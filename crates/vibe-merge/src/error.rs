//! Error types for the merge pipeline.

use std::path::PathBuf;
use thiserror::Error;

use vibe_store::StoreError;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur during a merge job.
///
/// The first four variants are validation-time: local, no network performed,
/// safe to report verbatim. The publish and retrieval variants wrap the
/// store's transport errors; each publish failure names the originating
/// file.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Need at least 2 files to merge, got {count}")]
    InsufficientInputs { count: usize },

    #[error("Missing local files: {}", join_paths(.0))]
    MissingFiles(Vec<PathBuf>),

    #[error("All files must share the same extension, got: {}", .0.join(", "))]
    HeterogeneousInputs(Vec<String>),

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Failed to publish {}: {source}", .file.display())]
    Publish {
        file: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("Failed to retrieve merged result: {source}{}", hint_suffix(.hint))]
    Retrieval {
        #[source]
        source: StoreError,
        hint: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    pub fn publish(file: impl Into<PathBuf>, source: StoreError) -> Self {
        Self::Publish {
            file: file.into(),
            source,
        }
    }

    pub fn retrieval(source: StoreError, hint: Option<String>) -> Self {
        Self::Retrieval { source, hint }
    }

    /// Whether this error was raised before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InsufficientInputs { .. }
                | Self::MissingFiles(_)
                | Self::HeterogeneousInputs(_)
                | Self::UnsupportedExtension(_)
        )
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({})", hint),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_lists_all_paths() {
        let err = MergeError::MissingFiles(vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")]);
        let msg = err.to_string();
        assert!(msg.contains("a.mp4"));
        assert!(msg.contains("b.mp4"));
    }

    #[test]
    fn test_heterogeneous_lists_extensions() {
        let err = MergeError::HeterogeneousInputs(vec![".mp3".to_string(), ".mp4".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains(".mp3"));
        assert!(msg.contains(".mp4"));
    }

    #[test]
    fn test_retrieval_hint_is_rendered() {
        let err = MergeError::retrieval(
            StoreError::RetrievalFailed {
                status: 423,
                url: "https://media.test/merged.m4a".to_string(),
            },
            Some("try a different container such as mp3".to_string()),
        );
        assert!(err.to_string().contains("mp3"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(MergeError::InsufficientInputs { count: 1 }.is_validation());
        assert!(!MergeError::retrieval(
            StoreError::RetrievalFailed {
                status: 500,
                url: String::new()
            },
            None
        )
        .is_validation());
    }
}
