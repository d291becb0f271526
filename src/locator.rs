//! Ancestor-path configuration lookup
//!
//! For every changed file, walk from its directory up to the repository
//! root, checking `<dir>/<config name>` at each level. All walks of one
//! request share a [`SeenSet`], so a directory that is an ancestor of several
//! changed files is fetched once.
//!
//! In concat mode every valid configuration found is merged, deepest first
//! per walk, walks in change-list order. Otherwise the first valid
//! configuration across the whole change list is the only one kept.

use std::collections::HashSet;

use log::info;

use crate::document::MergedDocument;
use crate::error::Result;
use crate::fetch::{fetch_config, FetchOutcome};
use crate::path;
use crate::request::RequestContext;
use crate::scm::ScmClient;

/// Candidate paths already checked during one resolution.
#[derive(Debug, Default)]
pub struct SeenSet {
    paths: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path`; false if it was already recorded.
    pub fn insert(&mut self, path: &str) -> bool {
        self.paths.insert(path.to_string())
    }
}

/// Merge the configurations found above `changed_files`.
///
/// The returned document is empty when no candidate validated; malformed
/// candidates and transport failures abort with an error.
pub fn locate(
    scm: &dyn ScmClient,
    ctx: &mut RequestContext<'_>,
    changed_files: &[String],
    concat: bool,
) -> Result<MergedDocument> {
    let mut seen = SeenSet::new();
    let mut document = MergedDocument::new();
    let config_name = ctx.config_name();

    'files: for changed_file in changed_files {
        for dir in path::containing_dirs(changed_file) {
            let candidate = path::join(&dir, config_name);
            if !seen.insert(&candidate) {
                continue;
            }

            let FetchOutcome::Found(config) = fetch_config(scm, ctx, &candidate)? else {
                continue;
            };
            document.append(&config.content);

            if !concat {
                info!(
                    "{} concat is disabled. Using just first {}.",
                    ctx.id(),
                    config_name
                );
                break 'files;
            }
        }
    }

    Ok(document)
}
