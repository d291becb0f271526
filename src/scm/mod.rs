//! # SCM Collaborators
//!
//! The resolver never talks to a source-control platform directly. It
//! consumes the [`ScmClient`] capability trait, which answers four questions
//! about a repository: which files changed between two revisions, which files
//! a pull request changes, what a file contains at a revision, and what a
//! directory holds at a revision.
//!
//! ## Design
//!
//! The trait separates the resolution algorithm from any concrete transport,
//! which keeps the core testable without a network. Two implementations ship
//! with the crate:
//!
//! - **[`GitCli`]** answers from a local clone by running the system `git`
//!   command.
//! - **[`MemoryScm`]** answers from an in-memory snapshot, records every call
//!   made against it and can inject failures. Tests use it, and the `scan`
//!   command loads it from a working tree.
//!
//! Hosted platform clients (REST/GraphQL) plug in by implementing the same
//! trait; retries for transient failures belong in those implementations, the
//! resolver treats every error it sees as final.
//!
//! ## Error contract
//!
//! `find_content` must report a missing path as
//! [`Error::FileNotFound`](crate::error::Error::FileNotFound) and a
//! non-file entry as [`Error::NotAFile`](crate::error::Error::NotAFile). Any
//! other error is treated as a transport failure and aborts the resolution.

pub mod git;
pub mod memory;

pub use git::GitCli;
pub use memory::{MemoryScm, ScmCall};

use crate::error::Result;
use crate::event::{Repo, RevisionRange};

/// What a directory entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Submodule,
    /// The collaborator could not tell.
    Unknown,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Last path segment.
    pub name: String,
    /// Root-relative absolute path of the entry.
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: &str, path: &str, kind: EntryKind) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind,
        }
    }
}

/// Capability interface the resolver consumes.
///
/// Paths passed in are root-relative absolute (`/a/b/.pipeline.yml`, `/` for
/// the root). Paths returned by the change listings may be relative; the
/// resolver normalizes them.
pub trait ScmClient: Send + Sync {
    /// Files changed between `range.before` and `range.after`.
    fn list_changes(&self, repo: &Repo, range: &RevisionRange) -> Result<Vec<String>>;

    /// Files changed by pull/merge request `number`.
    fn list_pull_request_changes(&self, repo: &Repo, number: u64) -> Result<Vec<String>>;

    /// Content of the regular file at `path` as of `revision`.
    fn find_content(&self, repo: &Repo, path: &str, revision: &str) -> Result<Vec<u8>>;

    /// Immediate children of the directory at `path` as of `revision`.
    fn list_directory(&self, repo: &Repo, path: &str, revision: &str) -> Result<Vec<DirEntry>>;
}

impl<T: ScmClient + ?Sized> ScmClient for &T {
    fn list_changes(&self, repo: &Repo, range: &RevisionRange) -> Result<Vec<String>> {
        (**self).list_changes(repo, range)
    }

    fn list_pull_request_changes(&self, repo: &Repo, number: u64) -> Result<Vec<String>> {
        (**self).list_pull_request_changes(repo, number)
    }

    fn find_content(&self, repo: &Repo, path: &str, revision: &str) -> Result<Vec<u8>> {
        (**self).find_content(repo, path, revision)
    }

    fn list_directory(&self, repo: &Repo, path: &str, revision: &str) -> Result<Vec<DirEntry>> {
        (**self).list_directory(repo, path, revision)
    }
}

impl<T: ScmClient + ?Sized> ScmClient for Box<T> {
    fn list_changes(&self, repo: &Repo, range: &RevisionRange) -> Result<Vec<String>> {
        (**self).list_changes(repo, range)
    }

    fn list_pull_request_changes(&self, repo: &Repo, number: u64) -> Result<Vec<String>> {
        (**self).list_pull_request_changes(repo, number)
    }

    fn find_content(&self, repo: &Repo, path: &str, revision: &str) -> Result<Vec<u8>> {
        (**self).find_content(repo, path, revision)
    }

    fn list_directory(&self, repo: &Repo, path: &str, revision: &str) -> Result<Vec<DirEntry>> {
        (**self).list_directory(repo, path, revision)
    }
}
