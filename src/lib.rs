//! # Pipeline Tree Library
//!
//! This library resolves the build-pipeline configuration of a monorepo from
//! the files a build changed. It is used by the `pipeline-tree` command-line
//! tool, and can be embedded by anything that receives build events and has
//! access to the repository through an SCM.
//!
//! ## Quick Example
//!
//! ```
//! use pipeline_tree::event::{Build, BuildEvent, Repo, Trigger};
//! use pipeline_tree::resolver::Resolver;
//! use pipeline_tree::scm::MemoryScm;
//! use pipeline_tree::settings::Settings;
//!
//! let scm = MemoryScm::new()
//!     .with_changes("abc", &["services/api/main.go"])
//!     .with_file("services/api/.pipeline.yml", "kind: pipeline\nname: api\n");
//!
//! let event = BuildEvent {
//!     repo: Repo::new("octocat", "monorepo"),
//!     build: Build {
//!         trigger: Trigger::Push,
//!         r#ref: "refs/heads/main".to_string(),
//!         before: Some("def".to_string()),
//!         after: "abc".to_string(),
//!     },
//! };
//!
//! let resolver = Resolver::new(scm, Settings::default());
//! let document = resolver.resolve(&event).unwrap();
//! assert_eq!(document, "---\nkind: pipeline\nname: api\n");
//! ```
//!
//! ## Core Concepts
//!
//! - **Events (`event`)**: The build being resolved: repository, trigger,
//!   ref and commit range.
//! - **SCM (`scm`)**: The [`scm::ScmClient`] trait the resolver reads the
//!   repository through, with a `git` command-line backend and an in-memory
//!   backend.
//! - **Settings (`settings`)**: `concat`, `fallback`, `max_depth` and the
//!   per-request budget.
//! - **Documents (`document`)**: The multi-document YAML stream handed back
//!   to the build system.
//!
//! ## Execution Flow
//!
//! [`resolver::Resolver::resolve`] runs each request through these steps:
//!
//! 1.  **Changes** (`changes`): list the files the build touched, or decide
//!     a full scan is needed.
//! 2.  **Lookup**: walk every changed file's ancestor directories
//!     (`locator`), or scan the tree to a bounded depth (`scanner`).
//! 3.  **Validation** (`fetch`): every candidate must be absent or carry a
//!     `kind` and a `name`; anything else fails the request.
//! 4.  **Emit** (`document`): merge the found files and clean up the stream.

pub mod budget;
pub mod changes;
pub mod defaults;
pub mod document;
pub mod error;
pub mod event;
pub mod fetch;
pub mod locator;
pub mod output;
pub mod path;
pub mod request;
pub mod resolver;
pub mod scanner;
pub mod scm;
pub mod settings;

#[cfg(test)]
mod locator_proptest;
#[cfg(test)]
mod path_proptest;

pub use error::{Error, Result};
pub use resolver::Resolver;
