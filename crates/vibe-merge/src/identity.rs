//! Resource identity mapping.

use std::collections::HashSet;
use std::path::PathBuf;

use vibe_models::ResourceIdentifier;

/// Map each input file, in input order, to a job-unique identifier.
///
/// The base identifier is the sanitized file stem. On a collision within
/// the job the 0-based position of the current file is appended; if that
/// candidate also collides (a stem that already carried the positional
/// pattern), the suffix keeps incrementing until unique. Pure and
/// deterministic for a given input order; uniqueness holds within the job,
/// not globally.
pub fn assign_identifiers(files: &[PathBuf]) -> Vec<ResourceIdentifier> {
    let mut assigned: HashSet<String> = HashSet::with_capacity(files.len());
    let mut identifiers = Vec::with_capacity(files.len());

    for (position, file) in files.iter().enumerate() {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = ResourceIdentifier::from_stem(&stem);

        let mut candidate = base.clone();
        let mut suffix = position;
        while !assigned.insert(candidate.as_str().to_string()) {
            candidate = base.with_suffix(suffix);
            suffix += 1;
        }

        identifiers.push(candidate);
    }

    identifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn assigned(names: &[&str]) -> Vec<String> {
        assign_identifiers(&paths(names))
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_distinct_stems_pass_through() {
        assert_eq!(
            assigned(&["intro.mp4", "body.mp4", "outro.mp4"]),
            vec!["intro", "body", "outro"]
        );
    }

    #[test]
    fn test_sanitized_collision_gets_positional_suffix() {
        // Both stems sanitize to "clip_1"; the second file sits at index 1.
        assert_eq!(
            assigned(&["clip!1.m4a", "clip_1.m4a"]),
            vec!["clip_1", "clip_1_1"]
        );
    }

    #[test]
    fn test_deterministic_across_runs() {
        let inputs = paths(&["clip!1.m4a", "clip_1.m4a", "clip?1.m4a"]);
        assert_eq!(assign_identifiers(&inputs), assign_identifiers(&inputs));
    }

    #[test]
    fn test_positional_suffix_collision_keeps_incrementing() {
        // Index-1 candidate "take_1" is itself taken by the third stem, so
        // the suffix walks forward until unique.
        let ids = assigned(&["take.m4a", "take.m4a", "take_1.m4a"]);
        assert_eq!(ids.len(), 3);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 3, "identifiers must be job-unique: {ids:?}");
        assert_eq!(ids[0], "take");
        assert_eq!(ids[1], "take_1");
        assert_ne!(ids[2], "take_1");
    }

    #[test]
    fn test_reordering_changes_assignment() {
        let forward = assigned(&["clip!1.m4a", "clip_1.m4a"]);
        let reversed = assigned(&["clip_1.m4a", "clip!1.m4a"]);
        assert_ne!(forward, reversed);
    }
}
