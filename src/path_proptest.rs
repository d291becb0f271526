//! Property-based tests for repository path functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{containing_dirs, depth, join, normalize, parent, ROOT};
    use proptest::prelude::*;

    /// Strategy for plausible changed-file paths, including `.`/`..` noise.
    fn changed_path() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-z0-9_-]{1,8}",
                Just(".".to_string()),
                Just("..".to_string()),
                Just(String::new()),
            ],
            0..8,
        )
        .prop_map(|segments| segments.join("/"))
    }

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(input in changed_path()) {
            let once = normalize(&input);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Property: normalized paths are absolute and never contain dot segments
        #[test]
        fn normalize_yields_clean_absolute_paths(input in changed_path()) {
            let result = normalize(&input);
            prop_assert!(result.starts_with('/'));
            prop_assert!(!result.contains("//"));
            for segment in result.split('/') {
                prop_assert!(segment != "." && segment != "..");
            }
            prop_assert!(result == ROOT || !result.ends_with('/'));
        }
    }

    // ============================================================================
    // ancestor walk property tests
    // ============================================================================

    proptest! {
        /// Property: every walk ends at the root and each step is the parent of the previous one
        #[test]
        fn containing_dirs_climb_one_level_at_a_time(input in changed_path()) {
            let dirs = containing_dirs(&input);
            prop_assert_eq!(dirs.last().map(String::as_str), Some(ROOT));
            for pair in dirs.windows(2) {
                prop_assert_eq!(parent(&pair[0]), Some(pair[1].clone()));
                prop_assert_eq!(depth(&pair[0]), depth(&pair[1]) + 1);
            }
        }

        /// Property: the walk has no repeated directory
        #[test]
        fn containing_dirs_are_distinct(input in changed_path()) {
            let dirs = containing_dirs(&input);
            let mut unique = dirs.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), dirs.len());
        }

        /// Property: a candidate joined onto any walk directory stays inside that directory
        #[test]
        fn join_stays_under_directory(input in changed_path(), name in "[a-z.]{1,12}") {
            prop_assume!(name != "." && name != ".." && !name.chars().all(|c| c == '.'));
            for dir in containing_dirs(&input) {
                let candidate = join(&dir, &name);
                prop_assert_eq!(parent(&candidate), Some(dir.clone()));
            }
        }
    }
}
