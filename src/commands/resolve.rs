//! # Resolve Command Implementation
//!
//! This module implements the `resolve` subcommand: read a build event, resolve
//! it against a local git clone and print the merged pipeline document.
//!
//! ## Example
//!
//! ```bash
//! pipeline-tree resolve --event event.json --repo ./monorepo --concat
//! ```
//!
//! The document goes to stdout (or `--output`); logs go to stderr, so the
//! output can be piped straight into a build system.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pipeline_tree::event::BuildEvent;
use pipeline_tree::scm::GitCli;
use pipeline_tree::settings::Settings;
use pipeline_tree::Resolver;

/// Resolve the pipeline document of a build event
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Build event file (JSON for `.json`, YAML otherwise)
    #[arg(long, value_name = "FILE")]
    pub event: PathBuf,

    /// Local clone of the repository
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Revision pull request heads are compared against
    #[arg(long, value_name = "REF", default_value = "HEAD")]
    pub pull_base: String,

    /// Write the document to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Load the event at `path` and build a git-backed resolver for `repo`.
pub(crate) fn open(
    event: &Path,
    repo: &Path,
    pull_base: &str,
    settings: Settings,
) -> Result<(BuildEvent, Resolver<GitCli>)> {
    let event = BuildEvent::from_file(event)
        .with_context(|| format!("Failed to load build event from {}", event.display()))?;
    let scm = GitCli::new(repo).with_pull_base(pull_base);
    Ok((event, Resolver::new(scm, settings)))
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, settings: Settings) -> Result<()> {
    let (event, resolver) = open(&args.event, &args.repo, &args.pull_base, settings)?;
    let document = resolver.resolve(&event)?;

    match &args.output {
        Some(path) => fs::write(path, &document)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", document),
    }
    Ok(())
}
