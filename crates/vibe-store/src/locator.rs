//! Splice locator construction.
//!
//! The store materializes derived media lazily: requesting a delivery URL
//! whose path carries a chain of transformation segments causes the store to
//! produce the derived file and serve its bytes. Concatenation is expressed
//! by layering each overlay resource onto the base with the `splice` flag.
//!
//! Construction is pure string work; no network I/O happens here.

use vibe_models::CompositionSpec;

/// Path segment for one spliced overlay.
fn overlay_segment(identifier: &str) -> String {
    format!("fl_splice,l_video:{}", urlencoding::encode(identifier))
}

/// Build the delivery URL that materializes an ordered concatenation.
///
/// Shape: `{delivery_base}/{cloud}/video/upload/<overlay>/<overlay>/.../{base}.{format}`
/// with one overlay segment per appended resource, in merge order. The
/// format extension equals the shared input extension; the store is never
/// asked to change container.
pub fn splice_url(delivery_base: &str, cloud_name: &str, spec: &CompositionSpec) -> String {
    let mut url = format!(
        "{}/{}/video/upload",
        delivery_base.trim_end_matches('/'),
        cloud_name
    );

    for overlay in &spec.overlays {
        url.push('/');
        url.push_str(&overlay_segment(overlay.as_str()));
    }

    url.push('/');
    url.push_str(&urlencoding::encode(spec.base.as_str()));
    url.push('.');
    url.push_str(&spec.output_format);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_models::ResourceIdentifier;

    fn spec(names: &[&str], format: &str) -> CompositionSpec {
        let ids: Vec<_> = names
            .iter()
            .map(|n| ResourceIdentifier::from_string(*n))
            .collect();
        CompositionSpec::from_ordered(&ids, format).unwrap()
    }

    #[test]
    fn test_single_overlay() {
        let url = splice_url(
            "https://media.example.com",
            "democloud",
            &spec(&["intro", "body"], "mp4"),
        );
        assert_eq!(
            url,
            "https://media.example.com/democloud/video/upload/fl_splice,l_video:body/intro.mp4"
        );
    }

    #[test]
    fn test_overlay_order_matches_input_order() {
        let url = splice_url("https://m.test", "c", &spec(&["a", "b", "c2", "d"], "m4a"));
        let b = url.find("l_video:b").unwrap();
        let c2 = url.find("l_video:c2").unwrap();
        let d = url.find("l_video:d").unwrap();
        assert!(b < c2 && c2 < d, "overlays must appear in input order");
        assert!(url.ends_with("/a.m4a"));
    }

    #[test]
    fn test_reordering_changes_url() {
        let a = splice_url("https://m.test", "c", &spec(&["x", "y"], "mp4"));
        let b = splice_url("https://m.test", "c", &spec(&["y", "x"], "mp4"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_trailing_slash_on_base() {
        let url = splice_url("https://m.test/", "c", &spec(&["x", "y"], "mp4"));
        assert!(url.starts_with("https://m.test/c/video/upload/"));
    }
}
