//! Input validation for merge jobs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use vibe_models::MediaKind;

use crate::error::{MergeError, MergeResult};

/// A validated job context: the inputs, their shared extension, and the
/// media kind resolved from it. Input order is frozen here and never
/// reordered afterward.
#[derive(Debug, Clone)]
pub struct ValidatedInputs {
    /// Input files in merge order
    pub files: Vec<PathBuf>,
    /// Shared lowercase extension with the leading dot, e.g. `".mp4"`
    pub extension: String,
    /// Media kind resolved from the shared extension
    pub kind: MediaKind,
}

impl ValidatedInputs {
    /// Output format without the leading dot.
    pub fn output_format(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Validate an ordered sequence of input paths.
///
/// Read-only: only existence checks, no other side effects. Every path is
/// checked so the missing-file error reports the complete absent set, not
/// just the first miss.
pub fn validate_inputs(paths: &[PathBuf]) -> MergeResult<ValidatedInputs> {
    if paths.len() < 2 {
        return Err(MergeError::InsufficientInputs { count: paths.len() });
    }

    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
    if !missing.is_empty() {
        return Err(MergeError::MissingFiles(missing));
    }

    let extensions: BTreeSet<String> = paths.iter().map(|p| dotted_extension(p)).collect();
    if extensions.len() != 1 {
        return Err(MergeError::HeterogeneousInputs(
            extensions.into_iter().collect(),
        ));
    }

    let extension = extensions.into_iter().next().expect("one extension");
    let kind = MediaKind::from_extension(&extension)
        .ok_or_else(|| MergeError::UnsupportedExtension(extension.clone()))?;

    Ok(ValidatedInputs {
        files: paths.to_vec(),
        extension,
        kind,
    })
}

/// Lowercase extension with a leading dot, or an empty string when the path
/// has none. The empty string deliberately participates in the distinct-set
/// check so extensionless files surface as heterogeneous or unsupported.
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}
