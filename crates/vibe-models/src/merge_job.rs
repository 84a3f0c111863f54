//! Merge job aggregate and lifecycle stages.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::composition::CompositionSpec;
use crate::media_kind::MediaKind;
use crate::resource::RemoteResource;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a merge job.
///
/// The progression is linear with no back-edges; any stage can transition
/// to `Failed`, after which the job is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStage {
    #[default]
    Started,
    Validated,
    KindResolved,
    Publishing,
    Composed,
    Fetched,
    Done,
    Failed,
}

impl MergeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStage::Started => "started",
            MergeStage::Validated => "validated",
            MergeStage::KindResolved => "kind_resolved",
            MergeStage::Publishing => "publishing",
            MergeStage::Composed => "composed",
            MergeStage::Fetched => "fetched",
            MergeStage::Done => "done",
            MergeStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MergeStage::Done | MergeStage::Failed)
    }

    /// The stage that follows this one in the linear progression, or `None`
    /// for terminal stages.
    pub fn next(&self) -> Option<MergeStage> {
        match self {
            MergeStage::Started => Some(MergeStage::Validated),
            MergeStage::Validated => Some(MergeStage::KindResolved),
            MergeStage::KindResolved => Some(MergeStage::Publishing),
            MergeStage::Publishing => Some(MergeStage::Composed),
            MergeStage::Composed => Some(MergeStage::Fetched),
            MergeStage::Fetched => Some(MergeStage::Done),
            MergeStage::Done | MergeStage::Failed => None,
        }
    }
}

impl fmt::Display for MergeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transient aggregate for one merge invocation.
///
/// Created per invocation and discarded after completion; no job-to-job
/// state is shared. Input order is frozen at validation and never changes
/// afterward, so derived identifiers are stable for the job's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MergeJob {
    /// Unique job ID
    pub id: JobId,

    /// Input files, in merge order
    pub inputs: Vec<PathBuf>,

    /// Media kind resolved from the shared extension
    pub kind: MediaKind,

    /// Shared lowercase extension including the leading dot, e.g. `".mp4"`
    pub extension: String,

    /// Published resources, ordered the same as the inputs
    #[serde(default)]
    pub resources: Vec<RemoteResource>,

    /// Composition spec once built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionSpec>,

    /// Output path the merged file is written to
    pub output_path: PathBuf,

    /// Current lifecycle stage
    #[serde(default)]
    pub stage: MergeStage,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl MergeJob {
    /// Create a new job for validated inputs.
    pub fn new(
        inputs: Vec<PathBuf>,
        kind: MediaKind,
        extension: impl Into<String>,
        output_path: PathBuf,
    ) -> Self {
        Self {
            id: JobId::new(),
            inputs,
            kind,
            extension: extension.into(),
            resources: Vec::new(),
            composition: None,
            output_path,
            stage: MergeStage::Started,
            created_at: Utc::now(),
        }
    }

    /// Output format without the leading dot, e.g. `"mp4"`.
    pub fn output_format(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Advance the job to the given stage.
    ///
    /// The only legal moves are to the immediate next stage or to `Failed`;
    /// the progression has no branches and no back-edges.
    pub fn advance(&mut self, stage: MergeStage) {
        debug_assert!(
            stage == MergeStage::Failed || self.stage.next() == Some(stage),
            "illegal stage transition {} -> {}",
            self.stage,
            stage
        );
        self.stage = stage;
    }
}
