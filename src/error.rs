//! # Error Handling
//!
//! This module defines the centralized error type for `pipeline-tree`. It uses
//! the `thiserror` library to create a single `Error` enum covering every
//! failure a resolution can end in, with messages that name the offending
//! path or command where one exists.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into four groups:
//!   - *absence*: `FileNotFound` and `NotAFile` are reported by SCM
//!     collaborators for a single candidate path. The resolver recovers from
//!     them locally and moves on to the next candidate.
//!   - *critical validation*: `MalformedConfig` aborts the whole resolution.
//!   - *terminal*: `NotFound` is returned when no configuration was located.
//!   - *transport and limits*: `Scm`, `GitCommand`, `DeadlineExceeded` and
//!     `ScmCallLimit` abort the resolution immediately.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::time::Duration;

use thiserror::Error;

/// Main error type for pipeline-tree operations
#[derive(Error, Debug)]
pub enum Error {
    /// No configuration file was located for the build.
    #[error("did not find a {config} for {repo}")]
    NotFound { repo: String, config: String },

    /// A configuration file exists at a candidate path but fails the minimal
    /// structural validation.
    #[error("Malformed pipeline configuration at {path}: {message}")]
    MalformedConfig { path: String, message: String },

    /// The SCM has no file at the requested path and revision.
    #[error("File not found: {path}@{revision}")]
    FileNotFound { path: String, revision: String },

    /// The SCM has an entry at the requested path, but it is not a regular
    /// file (a directory, symlink or submodule).
    #[error("Not a regular file: {path}@{revision}")]
    NotAFile { path: String, revision: String },

    /// An SCM call failed (network, authentication, rate limiting, or an
    /// answer the resolver cannot interpret).
    #[error("SCM operation error: {operation} - {message}")]
    Scm { operation: String, message: String },

    /// A `git` command run by the git collaborator failed.
    #[error("Git command failed in {repo}: {command} - {stderr}")]
    GitCommand {
        command: String,
        repo: String,
        stderr: String,
    },

    /// The resolution ran past its wall-clock deadline.
    #[error("Resolution deadline exceeded after {elapsed:?} (limit {limit:?})")]
    DeadlineExceeded { elapsed: Duration, limit: Duration },

    /// The resolution tried to make more SCM calls than allowed.
    #[error("SCM call limit of {limit} reached before {operation}")]
    ScmCallLimit { limit: usize, operation: String },

    /// The build event cannot be resolved as given.
    #[error("Invalid build event: {message}")]
    InvalidEvent { message: String },

    /// Resolver settings are out of bounds or unreadable.
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Whether this error only means "nothing usable at this path".
    ///
    /// Callers skip the candidate and continue; every other error aborts.
    pub fn is_absent(&self) -> bool {
        matches!(self, Error::FileNotFound { .. } | Error::NotAFile { .. })
    }

    /// Whether this error is the terminal "no configuration located" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Shorthand for an [`Error::Scm`] value.
    pub fn scm(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Scm {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
