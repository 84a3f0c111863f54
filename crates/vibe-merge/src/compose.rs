//! Composition building.

use vibe_models::{CompositionSpec, RemoteResource};

/// Build the composition spec for published resources in input order.
///
/// The first resource is the base; every subsequent resource becomes an
/// append overlay, so the output plays base, then the second input, then
/// the third, and so on. Callers guarantee at least two resources (the
/// validator enforces the two-input minimum before anything is published).
pub fn build_composition(
    resources: &[RemoteResource],
    output_format: impl Into<String>,
) -> CompositionSpec {
    let identifiers: Vec<_> = resources.iter().map(|r| r.identifier.clone()).collect();
    CompositionSpec::from_ordered(&identifiers, output_format)
        .expect("validated jobs always have at least one resource")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_models::ResourceIdentifier;

    fn resource(name: &str) -> RemoteResource {
        RemoteResource {
            identifier: ResourceIdentifier::from_string(name),
            delivery_url: format!("https://media.test/{name}.mp4"),
        }
    }

    #[test]
    fn test_overlays_equal_tail_in_order() {
        let resources = vec![resource("intro"), resource("body"), resource("outro")];
        let spec = build_composition(&resources, "mp4");

        assert_eq!(spec.base.as_str(), "intro");
        let overlays: Vec<_> = spec.overlays.iter().map(|o| o.as_str()).collect();
        assert_eq!(overlays, vec!["body", "outro"]);
        assert_eq!(spec.output_format, "mp4");
    }

    #[test]
    fn test_format_matches_inputs() {
        let spec = build_composition(&[resource("a"), resource("b")], "m4a");
        assert_eq!(spec.output_format, "m4a");
    }
}
