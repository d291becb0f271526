//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which applies the same
//! minimal validation a resolution applies to every candidate file: the
//! leading YAML document must be a mapping with non-empty `kind` and `name`.
//!
//! Every file is checked and reported, then the command fails if any of them
//! did not pass. It is a read-only operation.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline_tree::fetch::validate_content;
use pipeline_tree::output::{OutputConfig, Status};

/// Check pipeline configuration files
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Files to check
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let mut failed = 0;

    for file in &args.files {
        let display = file.display().to_string();
        let result = fs::read_to_string(file)
            .map_err(|e| format!("unable to read file: {}", e))
            .and_then(|content| {
                validate_content(&display, &content).map_err(|e| e.to_string())
            });

        match result {
            Ok(header) => println!(
                "{} {} (kind: {}, name: {})",
                out.marker(Status::Ok),
                display,
                header.kind,
                header.name
            ),
            Err(message) => {
                failed += 1;
                println!("{} {}: {}", out.marker(Status::Error), display, message);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files failed validation", failed, args.files.len());
    }
    Ok(())
}
