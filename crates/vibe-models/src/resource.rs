//! Resource identifiers for the remote media store.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The remote store's addressable name for a published file.
///
/// Derived from a file's stem with every character outside `[A-Za-z0-9_-]`
/// replaced by `_`. Uniqueness is guaranteed per merge job by the identity
/// mapper, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ResourceIdentifier(pub String);

impl ResourceIdentifier {
    /// Derive an identifier from a file stem (name without extension).
    ///
    /// Stems that sanitize to an empty string fall back to `"file"` so the
    /// store never sees an empty key.
    pub fn from_stem(stem: &str) -> Self {
        let sanitized: String = stem
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if sanitized.is_empty() {
            Self("file".to_string())
        } else {
            Self(sanitized)
        }
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Identifier with a numeric suffix appended, for collision resolution.
    pub fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}_{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The external-store counterpart of a local file after publishing.
///
/// Holds the confirmed identifier and the store's delivery URL for the raw
/// resource. Owned by the publishing job; never persisted across jobs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoteResource {
    /// Confirmed identifier, equal to the one requested at publish time.
    pub identifier: ResourceIdentifier,
    /// Delivery URL for the published resource, for observability.
    pub delivery_url: String,
}
