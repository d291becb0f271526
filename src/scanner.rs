//! Depth-bounded tree scan
//!
//! Used when a build has no usable change list: scheduled builds, and builds
//! without changes when fallback is enabled. The scan lists directories
//! through the SCM, depth-first in listing order, and collects every entry
//! named like the configuration file.
//!
//! The traversal runs off an explicit work-list. Directories deeper than
//! `max_depth` (the root is depth 0) are skipped without being listed.

use log::{debug, info};

use crate::document::MergedDocument;
use crate::error::{Error, Result};
use crate::fetch::{fetch_config, FetchOutcome};
use crate::path;
use crate::request::RequestContext;
use crate::scm::{EntryKind, ScmClient};

/// How far and how much to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub max_depth: usize,
    pub concat: bool,
}

enum Work {
    List { dir: String, depth: usize },
    Fetch(String),
}

/// Scan from the repository root.
pub fn scan(
    scm: &dyn ScmClient,
    ctx: &mut RequestContext<'_>,
    options: ScanOptions,
) -> Result<MergedDocument> {
    scan_from(scm, ctx, path::ROOT, options)
}

/// Scan from `start`, which counts as depth 0.
fn scan_from(
    scm: &dyn ScmClient,
    ctx: &mut RequestContext<'_>,
    start: &str,
    options: ScanOptions,
) -> Result<MergedDocument> {
    let config_name = ctx.config_name();
    let mut document = MergedDocument::new();
    let mut stack = vec![Work::List {
        dir: path::normalize(start),
        depth: 0,
    }];

    while let Some(work) = stack.pop() {
        match work {
            Work::List { dir, depth } => {
                if depth > options.max_depth {
                    info!(
                        "{} skipping scan of {}, max depth {} reached.",
                        ctx.id(),
                        dir,
                        options.max_depth
                    );
                    continue;
                }

                ctx.charge(&format!("list_directory {}", dir))?;
                let entries = scm.list_directory(ctx.repo(), &dir, ctx.revision())?;

                // Reversed so entries pop in listing order.
                for entry in entries.into_iter().rev() {
                    match entry.kind {
                        EntryKind::Directory => stack.push(Work::List {
                            dir: entry.path,
                            depth: depth + 1,
                        }),
                        EntryKind::File if entry.name == config_name => {
                            stack.push(Work::Fetch(entry.path))
                        }
                        EntryKind::File => {}
                        EntryKind::Symlink | EntryKind::Submodule => {
                            debug!("{} skipping {:?} {}", ctx.id(), entry.kind, entry.path);
                        }
                        EntryKind::Unknown => {
                            return Err(Error::scm(
                                "list_directory",
                                format!(
                                    "cannot tell whether {} is a file or a directory",
                                    entry.path
                                ),
                            ));
                        }
                    }
                }
            }
            Work::Fetch(file) => {
                let FetchOutcome::Found(config) = fetch_config(scm, ctx, &file)? else {
                    continue;
                };
                document.append(&config.content);
                if !options.concat {
                    info!(
                        "{} concat is disabled. Using just first {}.",
                        ctx.id(),
                        config_name
                    );
                    break;
                }
            }
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Build, BuildEvent, Repo, Trigger};
    use crate::scm::MemoryScm;
    use crate::settings::Settings;

    fn event() -> BuildEvent {
        BuildEvent {
            repo: Repo::new("octocat", "monorepo"),
            build: Build {
                trigger: Trigger::Cron,
                r#ref: "refs/heads/main".to_string(),
                before: None,
                after: "abc".to_string(),
            },
        }
    }

    fn tree() -> MemoryScm {
        MemoryScm::new()
            .with_file(".pipeline.yml", "kind: pipeline\nname: root\n")
            .with_file("a/.pipeline.yml", "kind: pipeline\nname: a\n")
            .with_file("a/b/.pipeline.yml", "kind: pipeline\nname: ab\n")
            .with_file("a/b/c/.pipeline.yml", "kind: pipeline\nname: abc\n")
            .with_file("z/.pipeline.yml", "kind: pipeline\nname: z\n")
            .with_file("z/main.go", "package z\n")
    }

    fn run(scm: &MemoryScm, max_depth: usize, concat: bool) -> Result<MergedDocument> {
        let event = event();
        let mut ctx = RequestContext::new(&event, &Settings::default());
        scan(scm, &mut ctx, ScanOptions { max_depth, concat })
    }

    fn names(doc: &MergedDocument) -> Vec<String> {
        doc.as_str()
            .lines()
            .filter_map(|line| line.strip_prefix("name: "))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_depth_first_listing_order() {
        let scm = tree();
        let doc = run(&scm, 2, true).unwrap();
        assert_eq!(names(&doc), vec!["root", "a", "ab", "z"]);
    }

    #[test]
    fn test_deeper_directories_are_not_listed() {
        let scm = tree();
        run(&scm, 2, true).unwrap();
        let listed = scm.listed_dirs();
        assert!(listed.contains(&"/a/b".to_string()));
        assert!(!listed.contains(&"/a/b/c".to_string()));
    }

    #[test]
    fn test_max_depth_zero_is_root_only() {
        let scm = tree();
        let doc = run(&scm, 0, true).unwrap();
        assert_eq!(names(&doc), vec!["root"]);
        assert_eq!(scm.listed_dirs(), vec!["/"]);
    }

    #[test]
    fn test_single_match_stops_scan() {
        let scm = tree();
        let doc = run(&scm, 2, false).unwrap();
        assert_eq!(names(&doc), vec!["root"]);
        assert_eq!(scm.listed_dirs(), vec!["/"]);
        assert_eq!(scm.fetched_paths(), vec!["/.pipeline.yml"]);
    }

    #[test]
    fn test_empty_tree_is_empty_document() {
        let scm = MemoryScm::new().with_file("src/main.rs", "fn main() {}\n");
        let doc = run(&scm, 2, true).unwrap();
        assert!(doc.is_empty());
        assert!(scm.fetched_paths().is_empty());
    }

    #[test]
    fn test_unknown_entry_is_an_error() {
        let scm = tree().with_entry("a/mystery", EntryKind::Unknown);
        let err = run(&scm, 2, true).unwrap_err();
        assert!(matches!(err, Error::Scm { .. }));
        assert!(err.to_string().contains("/a/mystery"));
    }

    #[test]
    fn test_symlinks_and_submodules_are_skipped() {
        let scm = MemoryScm::new()
            .with_entry(".pipeline.yml", EntryKind::Symlink)
            .with_entry("vendor/lib", EntryKind::Submodule)
            .with_file("svc/.pipeline.yml", "kind: pipeline\nname: svc\n");
        let doc = run(&scm, 2, true).unwrap();
        assert_eq!(names(&doc), vec!["svc"]);
    }

    #[test]
    fn test_listing_failure_propagates() {
        let scm = tree().with_failure("/a", "500 Internal Server Error");
        let err = run(&scm, 2, true).unwrap_err();
        assert!(err.to_string().contains("500 Internal Server Error"));
    }

    #[test]
    fn test_call_limit_bounds_scan() {
        let scm = tree();
        let event = event();
        let settings = Settings {
            max_scm_calls: 3,
            ..Default::default()
        };
        let mut ctx = RequestContext::new(&event, &settings);
        let err = scan(
            &scm,
            &mut ctx,
            ScanOptions {
                max_depth: 2,
                concat: true,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::ScmCallLimit { limit: 3, .. }));
        assert_eq!(scm.calls().len(), 3);
    }

    #[test]
    fn test_scan_from_subdirectory() {
        let scm = tree();
        let event = event();
        let mut ctx = RequestContext::new(&event, &Settings::default());
        let doc = scan_from(
            &scm,
            &mut ctx,
            "/a",
            ScanOptions {
                max_depth: 1,
                concat: true,
            },
        )
        .unwrap();
        assert_eq!(names(&doc), vec!["a", "ab"]);
    }
}
