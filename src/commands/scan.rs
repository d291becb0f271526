//! # Scan Command Implementation
//!
//! Runs the depth-bounded tree scan over a working tree on disk, the same
//! lookup a scheduled build performs, and prints the merged document. Useful
//! for checking what `--max-depth` and `--concat` pick up before enabling
//! them for a repository.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pipeline_tree::defaults::DEFAULT_CONFIG_NAME;
use pipeline_tree::event::{Build, BuildEvent, Repo, Trigger};
use pipeline_tree::scm::MemoryScm;
use pipeline_tree::settings::Settings;
use pipeline_tree::Resolver;

/// Scan a working tree for pipeline configuration files
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Working tree to scan
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file name to look for
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CONFIG_NAME)]
    pub config_name: String,
}

/// Execute the `scan` command.
pub fn execute(args: ScanArgs, settings: Settings) -> Result<()> {
    let scm = MemoryScm::from_dir(&args.dir, settings.max_depth)
        .with_context(|| format!("Failed to read working tree {}", args.dir.display()))?;

    let name = args
        .dir
        .canonicalize()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "working-tree".to_string());
    let mut repo = Repo::new("local", &name);
    repo.config = args.config_name;

    let event = BuildEvent {
        repo,
        build: Build {
            trigger: Trigger::Cron,
            r#ref: String::new(),
            before: None,
            after: "WORKTREE".to_string(),
        },
    };

    let document = Resolver::new(scm, settings).resolve(&event)?;
    print!("{}", document);
    Ok(())
}
