//! Shared data models for VibeVideo backend.
//!
//! This crate provides Serde-serializable types for:
//! - Media kind classification and the supported extension sets
//! - Resource identifiers for the remote media store
//! - Composition specs for ordered splice operations
//! - Merge jobs and their lifecycle stages
//! - Audio cleanup operations

pub mod cleanup;
pub mod composition;
pub mod media_kind;
pub mod merge_job;
pub mod resource;
pub mod utils;

// Re-export common types
pub use cleanup::{CleanupOp, CleanupOpParseError};
pub use composition::CompositionSpec;
pub use media_kind::{MediaKind, AUDIO_EXTENSIONS, VIDEO_EXTENSIONS};
pub use merge_job::{JobId, MergeJob, MergeStage};
pub use resource::{RemoteResource, ResourceIdentifier};
pub use utils::format_file_size;
