//! # Pipeline Tree CLI
//!
//! Binary entry point for the `pipeline-tree` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments and their environment bindings using `clap`.
//! - Initializing logging.
//! - Running the selected command and reporting its error.
//!
//! The resolution logic lives in the `pipeline_tree` library crate; the binary
//! only wires a local SCM collaborator to it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
