//! Audio cleanup operations.
//!
//! Each operation maps to a stable command token (the user-facing name) and
//! to the config payload the remote cleanup service expects for it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for a token that names no known cleanup operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown cleanup operation: {0}")]
pub struct CleanupOpParseError(pub String);

/// An audio cleanup operation supported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CleanupOp {
    /// Remove background noise (with normalization)
    DenoiseBg,
    /// Remove long silences
    RemoveSilences,
    /// Remove stutters
    RemoveStutters,
    /// Remove filler words
    RemoveFillers,
    /// Remove mouth sounds
    RemoveMouthSounds,
    /// Remove hesitations
    RemoveHesitations,
    /// Reduce breath sounds
    ReduceBreaths,
    /// Normalize audio levels
    Normalize,
    /// AI sound enhancement
    AiEnhance,
    /// Preserve music segments
    PreserveMusic,
    /// Transcribe audio to text
    Transcribe,
    /// Comprehensive enhancement (everything plus transcription)
    Comprehensive,
}

impl CleanupOp {
    /// All operations, for help output and iteration.
    pub const ALL: &'static [CleanupOp] = &[
        CleanupOp::DenoiseBg,
        CleanupOp::RemoveSilences,
        CleanupOp::RemoveStutters,
        CleanupOp::RemoveFillers,
        CleanupOp::RemoveMouthSounds,
        CleanupOp::RemoveHesitations,
        CleanupOp::ReduceBreaths,
        CleanupOp::Normalize,
        CleanupOp::AiEnhance,
        CleanupOp::PreserveMusic,
        CleanupOp::Transcribe,
        CleanupOp::Comprehensive,
    ];

    /// Stable command token.
    pub fn token(&self) -> &'static str {
        match self {
            CleanupOp::DenoiseBg => "rm bg",
            CleanupOp::RemoveSilences => "rm silence",
            CleanupOp::RemoveStutters => "rm stutter",
            CleanupOp::RemoveFillers => "rm filler",
            CleanupOp::RemoveMouthSounds => "rm mouth",
            CleanupOp::RemoveHesitations => "rm hesitation",
            CleanupOp::ReduceBreaths => "rm breath",
            CleanupOp::Normalize => "normalize",
            CleanupOp::AiEnhance => "ai enhance",
            CleanupOp::PreserveMusic => "preserve music",
            CleanupOp::Transcribe => "transcribe",
            CleanupOp::Comprehensive => "comprehensive",
        }
    }

    /// Human-readable operation name.
    pub fn label(&self) -> &'static str {
        match self {
            CleanupOp::DenoiseBg => "Remove Background Noise",
            CleanupOp::RemoveSilences => "Remove Long Silences",
            CleanupOp::RemoveStutters => "Remove Stutters",
            CleanupOp::RemoveFillers => "Remove Filler Words",
            CleanupOp::RemoveMouthSounds => "Remove Mouth Sounds",
            CleanupOp::RemoveHesitations => "Remove Hesitations",
            CleanupOp::ReduceBreaths => "Reduce Breath Sounds",
            CleanupOp::Normalize => "Normalize Audio Levels",
            CleanupOp::AiEnhance => "AI Sound Enhancement",
            CleanupOp::PreserveMusic => "Preserve Music Segments",
            CleanupOp::Transcribe => "Transcribe Audio to Text",
            CleanupOp::Comprehensive => "Comprehensive Enhancement",
        }
    }

    /// Token with spaces dashed, used in derived output file names.
    pub fn output_slug(&self) -> String {
        self.token().replace(' ', "-")
    }

    /// Config payload for the remote service's edit request.
    pub fn config_payload(&self) -> Value {
        let mut config = match self {
            CleanupOp::DenoiseBg => json!({ "denoise": true, "normalize": true }),
            CleanupOp::RemoveSilences => json!({ "long_silences": true }),
            CleanupOp::RemoveStutters => json!({ "stutters": true }),
            CleanupOp::RemoveFillers => json!({ "fillers": true }),
            CleanupOp::RemoveMouthSounds => json!({ "mouth_sounds": true }),
            CleanupOp::RemoveHesitations => json!({ "hesitations": true }),
            CleanupOp::ReduceBreaths => json!({ "breath": true, "breath_level": -80 }),
            CleanupOp::Normalize => json!({ "normalize": true, "target_lufs": -16 }),
            CleanupOp::AiEnhance => json!({ "sound_studio": true }),
            CleanupOp::PreserveMusic => json!({ "keep_music": true }),
            CleanupOp::Transcribe => json!({ "transcription": true }),
            CleanupOp::Comprehensive => json!({
                "denoise": true,
                "normalize": true,
                "fillers": true,
                "long_silences": true,
                "transcription": true,
            }),
        };

        // All edits keep the input container
        config["export_format"] = json!("auto");
        config
    }
}

impl fmt::Display for CleanupOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for CleanupOp {
    type Err = CleanupOpParseError;

    /// Parse a command token. Dashes are accepted in place of spaces so the
    /// token can be passed as a single shell argument.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', " ");
        Self::ALL
            .iter()
            .find(|op| op.token() == normalized)
            .copied()
            .ok_or_else(|| CleanupOpParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        for op in CleanupOp::ALL {
            assert_eq!(op.token().parse::<CleanupOp>().unwrap(), *op);
        }
    }

    #[test]
    fn test_dashed_tokens_parse() {
        assert_eq!("rm-bg".parse::<CleanupOp>().unwrap(), CleanupOp::DenoiseBg);
        assert_eq!(
            "preserve-music".parse::<CleanupOp>().unwrap(),
            CleanupOp::PreserveMusic
        );
    }

    #[test]
    fn test_unknown_token() {
        let err = "rm everything".parse::<CleanupOp>().unwrap_err();
        assert_eq!(err, CleanupOpParseError("rm everything".to_string()));
        assert!(err.to_string().contains("rm everything"));
    }

    #[test]
    fn test_output_slug() {
        assert_eq!(CleanupOp::DenoiseBg.output_slug(), "rm-bg");
        assert_eq!(CleanupOp::Normalize.output_slug(), "normalize");
    }

    #[test]
    fn test_config_payload_keeps_container() {
        for op in CleanupOp::ALL {
            assert_eq!(op.config_payload()["export_format"], "auto");
        }
    }
}
