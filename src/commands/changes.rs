//! # Changes Command Implementation
//!
//! Prints the change set the resolver would work from for a build event:
//! one changed path per line, or a note that the build needs a full scan or
//! has no changes. No configuration is fetched.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline_tree::changes::ChangeSet;
use pipeline_tree::settings::Settings;

use super::resolve;

/// Print the files a build event changed
#[derive(Args, Debug)]
pub struct ChangesArgs {
    /// Build event file (JSON for `.json`, YAML otherwise)
    #[arg(long, value_name = "FILE")]
    pub event: PathBuf,

    /// Local clone of the repository
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Revision pull request heads are compared against
    #[arg(long, value_name = "REF", default_value = "HEAD")]
    pub pull_base: String,
}

/// Execute the `changes` command.
pub fn execute(args: ChangesArgs, settings: Settings) -> Result<()> {
    let (event, resolver) = resolve::open(&args.event, &args.repo, &args.pull_base, settings)?;

    match resolver.changes(&event)? {
        ChangeSet::Files(files) => {
            for file in files {
                println!("{}", file);
            }
        }
        ChangeSet::NoChanges => eprintln!("no changed files"),
        ChangeSet::FullScan => eprintln!("scheduled build: full scan"),
    }
    Ok(())
}
