//! Default values for pipeline-tree configuration.
//!
//! This module provides centralized default values used by the resolver
//! settings, the build event loader and the CLI, ensuring consistency and
//! avoiding duplication.

/// Configuration file name looked up when a repository does not set one.
pub const DEFAULT_CONFIG_NAME: &str = ".pipeline.yml";

/// Deepest directory level listed by the fallback scanner (root is 0).
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Wall-clock budget of a single resolution.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// SCM calls a single resolution may make.
pub const DEFAULT_MAX_SCM_CALLS: usize = 1000;

/// Upper bound accepted for `timeout_seconds`.
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

/// Upper bound accepted for `max_scm_calls`.
pub const MAX_SCM_CALLS_LIMIT: usize = 100_000;

/// Environment variable naming a settings file.
pub const SETTINGS_ENV: &str = "PIPELINE_TREE_SETTINGS";
