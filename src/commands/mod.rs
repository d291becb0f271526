//! # CLI Command Implementations
//!
//! Each subcommand of `pipeline-tree` lives in its own file, with an `Args`
//! struct derived using `clap` and an `execute` function that calls into the
//! `pipeline_tree` library.
//!
//! Commands that resolve configuration receive the already-loaded
//! [`Settings`](pipeline_tree::settings::Settings) from the global flags.

pub mod changes;
pub mod completions;
pub mod resolve;
pub mod scan;
pub mod validate;
