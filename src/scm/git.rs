//! Git command-line collaborator
//!
//! Answers the [`ScmClient`] capability from a local clone using the system
//! `git` command, which automatically honours whatever authentication and
//! configuration the clone already has. Pull request changes require the
//! pull request head to be fetched locally, e.g.
//! `git fetch origin pull/42/head:refs/pull/42/head`.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::trace;

use super::{DirEntry, EntryKind, ScmClient};
use crate::error::{Error, Result};
use crate::event::{Repo, RevisionRange};
use crate::path;

/// Mode git uses for symbolic links.
const SYMLINK_MODE: &str = "120000";

/// One record of `git ls-tree` output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeEntry {
    mode: String,
    object_type: String,
    object: String,
    path: String,
}

impl TreeEntry {
    fn kind(&self) -> EntryKind {
        match self.object_type.as_str() {
            "blob" if self.mode == SYMLINK_MODE => EntryKind::Symlink,
            "blob" => EntryKind::File,
            "tree" => EntryKind::Directory,
            "commit" => EntryKind::Submodule,
            _ => EntryKind::Unknown,
        }
    }
}

/// Parse `git ls-tree -z` output: `<mode> <type> <object>\t<path>\0`.
fn parse_ls_tree(output: &[u8]) -> Result<Vec<TreeEntry>> {
    let text = String::from_utf8_lossy(output);
    let mut entries = Vec::new();
    for record in text.split('\0').filter(|r| !r.is_empty()) {
        let Some((meta, entry_path)) = record.split_once('\t') else {
            return Err(Error::scm(
                "ls-tree",
                format!("unexpected ls-tree record: {:?}", record),
            ));
        };
        let fields: Vec<&str> = meta.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(Error::scm(
                "ls-tree",
                format!("unexpected ls-tree record: {:?}", record),
            ));
        }
        entries.push(TreeEntry {
            mode: fields[0].to_string(),
            object_type: fields[1].to_string(),
            object: fields[2].to_string(),
            path: entry_path.to_string(),
        });
    }
    Ok(entries)
}

/// Split NUL-separated path output (`git diff --name-only -z`).
fn parse_name_list(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .split('\0')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// [`ScmClient`] backed by a local git clone.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
    pull_base: String,
}

impl GitCli {
    /// Collaborator for the clone at `repo_dir`. Pull requests are diffed
    /// against `HEAD` unless [`with_pull_base`](Self::with_pull_base) says
    /// otherwise.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            pull_base: "HEAD".to_string(),
        }
    }

    /// Revision pull request heads are compared against (merge-base diff).
    pub fn with_pull_base(mut self, pull_base: &str) -> Self {
        self.pull_base = pull_base.to_string();
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        trace!("git {} (in {})", args.join(" "), self.repo_dir.display());
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| Error::GitCommand {
                command: args.join(" "),
                repo: self.repo_dir.display().to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                repo: self.repo_dir.display().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    fn ls_tree(&self, revision: &str, pathspec: Option<&str>) -> Result<Vec<TreeEntry>> {
        let mut args = vec!["ls-tree", "-z", revision];
        if let Some(pathspec) = pathspec {
            args.push("--");
            args.push(pathspec);
        }
        parse_ls_tree(&self.run(&args)?)
    }

    /// Local ref holding the head of pull request `number`.
    fn pull_ref(&self, number: u64) -> Result<String> {
        for candidate in [
            format!("refs/pull/{}/head", number),
            format!("refs/merge-requests/{}/head", number),
        ] {
            let rev = format!("{}^{{commit}}", candidate);
            if self
                .run(&["rev-parse", "--verify", "--quiet", rev.as_str()])
                .is_ok()
            {
                return Ok(candidate);
            }
        }
        Err(Error::scm(
            "list_pull_request_changes",
            format!(
                "no local ref for pull request {}; fetch refs/pull/{}/head first",
                number, number
            ),
        ))
    }
}

impl ScmClient for GitCli {
    fn list_changes(&self, _repo: &Repo, range: &RevisionRange) -> Result<Vec<String>> {
        let output = self.run(&[
            "diff",
            "--name-only",
            "-z",
            range.before.as_str(),
            range.after.as_str(),
        ])?;
        Ok(parse_name_list(&output))
    }

    fn list_pull_request_changes(&self, _repo: &Repo, number: u64) -> Result<Vec<String>> {
        let head = self.pull_ref(number)?;
        let range = format!("{}...{}", self.pull_base, head);
        let output = self.run(&["diff", "--name-only", "-z", range.as_str()])?;
        Ok(parse_name_list(&output))
    }

    fn find_content(&self, _repo: &Repo, file: &str, revision: &str) -> Result<Vec<u8>> {
        let relative = path::relative(file);
        if relative.is_empty() {
            return Err(Error::NotAFile {
                path: file.to_string(),
                revision: revision.to_string(),
            });
        }

        let entries = self.ls_tree(revision, Some(relative))?;
        let Some(entry) = entries.into_iter().find(|entry| entry.path == relative) else {
            return Err(Error::FileNotFound {
                path: file.to_string(),
                revision: revision.to_string(),
            });
        };
        if entry.kind() != EntryKind::File {
            return Err(Error::NotAFile {
                path: file.to_string(),
                revision: revision.to_string(),
            });
        }
        self.run(&["cat-file", "blob", entry.object.as_str()])
    }

    fn list_directory(&self, _repo: &Repo, dir: &str, revision: &str) -> Result<Vec<DirEntry>> {
        let relative = path::relative(dir);
        let pathspec = format!("{}/", relative);
        let entries = if relative.is_empty() {
            self.ls_tree(revision, None)?
        } else {
            self.ls_tree(revision, Some(pathspec.as_str()))?
        };

        Ok(entries
            .iter()
            .map(|entry| {
                let full = path::normalize(&entry.path);
                DirEntry::new(path::file_name(&full), &full, entry.kind())
            })
            .collect())
    }
}
