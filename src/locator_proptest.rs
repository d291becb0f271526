//! Property-based tests for the ancestor-path configuration lookup.
//!
//! Change lists are drawn from a small directory alphabet so that changed
//! files share ancestors often, which is where duplicate fetches would show.

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use crate::defaults::DEFAULT_CONFIG_NAME;
    use crate::event::{Build, BuildEvent, Repo, Trigger};
    use crate::locator::locate;
    use crate::path::{containing_dirs, join};
    use crate::request::RequestContext;
    use crate::scm::MemoryScm;
    use crate::settings::Settings;
    use proptest::prelude::*;

    fn dir() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-c]", 0..4).prop_map(|segments| segments.join("/"))
    }

    fn changed_file() -> impl Strategy<Value = String> {
        dir().prop_map(|dir| format!("{}/main.go", dir))
    }

    fn snapshot(config_dirs: &[String]) -> MemoryScm {
        config_dirs.iter().fold(MemoryScm::new(), |scm, dir| {
            scm.with_file(
                &join(dir, DEFAULT_CONFIG_NAME),
                &format!("kind: pipeline\nname: p{}\n", dir.replace('/', "-")),
            )
        })
    }

    fn fetched(config_dirs: &[String], changed: &[String], concat: bool) -> Vec<String> {
        let scm = snapshot(config_dirs);
        let event = BuildEvent {
            repo: Repo::new("octocat", "monorepo"),
            build: Build {
                trigger: Trigger::Push,
                r#ref: "refs/heads/main".to_string(),
                before: None,
                after: "abc".to_string(),
            },
        };
        let mut ctx = RequestContext::new(&event, &Settings::default());
        locate(&scm, &mut ctx, changed, concat).unwrap();
        scm.fetched_paths()
    }

    proptest! {
        /// Property: no candidate path is fetched twice in one request
        #[test]
        fn no_candidate_fetched_twice(
            config_dirs in prop::collection::vec(dir(), 0..6),
            changed in prop::collection::vec(changed_file(), 0..12),
            concat in any::<bool>(),
        ) {
            let fetched = fetched(&config_dirs, &changed, concat);
            let unique: HashSet<&String> = fetched.iter().collect();
            prop_assert_eq!(unique.len(), fetched.len(), "duplicate fetch in {:?}", fetched);
        }

        /// Property: concat mode fetches every distinct ancestor candidate, deepest first per file
        #[test]
        fn concat_fetches_each_ancestor_once(
            config_dirs in prop::collection::vec(dir(), 0..6),
            changed in prop::collection::vec(changed_file(), 0..12),
        ) {
            let mut seen = HashSet::new();
            let expected: Vec<String> = changed
                .iter()
                .flat_map(|file| containing_dirs(file))
                .map(|dir| join(&dir, DEFAULT_CONFIG_NAME))
                .filter(|candidate| seen.insert(candidate.clone()))
                .collect();
            prop_assert_eq!(fetched(&config_dirs, &changed, true), expected);
        }

        /// Property: single-match mode fetches a prefix of what concat mode fetches
        #[test]
        fn single_match_fetches_a_prefix(
            config_dirs in prop::collection::vec(dir(), 0..6),
            changed in prop::collection::vec(changed_file(), 0..12),
        ) {
            let all = fetched(&config_dirs, &changed, true);
            let first = fetched(&config_dirs, &changed, false);
            prop_assert!(first.len() <= all.len());
            prop_assert_eq!(&all[..first.len()], &first[..]);
        }
    }
}
