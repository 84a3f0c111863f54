//! Media kind classification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extensions handled by the video pipeline.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "webm", "m4v"];

/// Extensions handled by the audio pipeline.
pub const AUDIO_EXTENSIONS: &[&str] = &["m4a", "mp3", "wav", "aac", "flac", "ogg"];

/// Audio vs. video classification, derived from a file extension.
///
/// The classification constrains which transformation pipeline applies.
/// The remote store itself accepts both kinds through its video resource
/// class, so this type never reaches the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Resolve the kind from a file extension.
    ///
    /// Accepts the extension with or without a leading dot, in any case.
    /// Returns `None` when the extension belongs to neither supported set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Audio)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
