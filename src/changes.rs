//! Change-set resolution
//!
//! Decides which files a build touched:
//!
//! - scheduled builds always request a full scan, without asking the SCM;
//! - pull/merge request refs use the pull request change listing;
//! - a pull request trigger on any other ref is treated like a push;
//! - everything else diffs `before..after`, with `<after>~1` standing in for
//!   a missing or all-zero `before`.
//!
//! An empty listing is reported as [`ChangeSet::NoChanges`], which the
//! resolver may or may not turn into a full scan depending on its fallback
//! setting.

use std::collections::HashSet;

use log::debug;

use crate::error::Result;
use crate::request::RequestContext;
use crate::scm::ScmClient;

/// Files a build touched, or why there is no list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSet {
    /// Changed paths in first-seen order, without duplicates.
    Files(Vec<String>),
    /// The SCM reported no changed files.
    NoChanges,
    /// Every configuration in the repository applies.
    FullScan,
}

impl ChangeSet {
    fn from_listing(files: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let files: Vec<String> = files
            .into_iter()
            .filter(|file| !file.trim().is_empty())
            .filter(|file| seen.insert(file.clone()))
            .collect();
        if files.is_empty() {
            ChangeSet::NoChanges
        } else {
            ChangeSet::Files(files)
        }
    }
}

/// Determine the change set of the request's build.
pub fn resolve_changes(scm: &dyn ScmClient, ctx: &mut RequestContext<'_>) -> Result<ChangeSet> {
    let event = ctx.event();

    if event.is_scheduled() {
        debug!("{} scheduled build, requesting full scan", ctx.id());
        return Ok(ChangeSet::FullScan);
    }

    let files = if let Some(number) = event.pull_request_number()? {
        ctx.charge(&format!("list_pull_request_changes {}", number))?;
        scm.list_pull_request_changes(&event.repo, number)?
    } else {
        let range = event.revision_range();
        ctx.charge(&format!("list_changes {}..{}", range.before, range.after))?;
        scm.list_changes(&event.repo, &range)?
    };

    let changes = ChangeSet::from_listing(files);
    if let ChangeSet::Files(files) = &changes {
        debug!("{} changed files: \n  {}", ctx.id(), files.join("\n  "));
    }
    Ok(changes)
}
