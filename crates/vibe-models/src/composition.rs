//! Composition specs for ordered splice operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resource::ResourceIdentifier;

/// An ordered splice: a base resource plus overlays appended in order.
///
/// This is the sole source of output ordering. The first published input is
/// the base; every subsequent input becomes an overlay appended onto it in
/// input order. The output format always equals the shared input extension
/// (the system never transcodes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompositionSpec {
    /// Base resource the overlays are appended onto.
    pub base: ResourceIdentifier,
    /// Overlays in merge order (inputs[1..] in original input order).
    pub overlays: Vec<ResourceIdentifier>,
    /// Output container format without a leading dot, e.g. `"mp4"`.
    pub output_format: String,
}

impl CompositionSpec {
    /// Build a spec from published identifiers in input order.
    ///
    /// Returns `None` for fewer than one identifier; callers validate the
    /// two-input minimum before publishing, so a one-element slice only
    /// occurs in tests.
    pub fn from_ordered(
        identifiers: &[ResourceIdentifier],
        output_format: impl Into<String>,
    ) -> Option<Self> {
        let (base, overlays) = identifiers.split_first()?;
        Some(Self {
            base: base.clone(),
            overlays: overlays.to_vec(),
            output_format: output_format.into(),
        })
    }

    /// Total number of resources spliced together.
    pub fn resource_count(&self) -> usize {
        1 + self.overlays.len()
    }
}
