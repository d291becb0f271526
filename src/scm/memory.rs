//! In-memory SCM collaborator
//!
//! [`MemoryScm`] holds a single snapshot of repository files plus the change
//! lists the resolver asks for. Revisions are accepted but not distinguished:
//! every `find_content`/`list_directory` answers from the same snapshot.
//!
//! Every call is recorded, so tests can assert exactly which paths a
//! resolution fetched, and failures can be injected per path to exercise
//! transport error handling.
//!
//! [`MemoryScm::from_dir`] indexes a working tree without reading it: file
//! bodies stay on disk until `find_content` asks for them.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use walkdir::WalkDir;

use super::{DirEntry, EntryKind, ScmClient};
use crate::error::{Error, Result};
use crate::event::{Repo, RevisionRange};
use crate::path;

/// A call made against a [`MemoryScm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmCall {
    ListChanges { before: String, after: String },
    ListPullRequestChanges(u64),
    FindContent(String),
    ListDirectory(String),
}

/// Body of a regular file in the snapshot.
#[derive(Debug, Clone)]
enum Content {
    Loaded(Vec<u8>),
    OnDisk(PathBuf),
}

/// Snapshot-backed [`ScmClient`] for tests and local working trees.
#[derive(Debug, Default)]
pub struct MemoryScm {
    /// Regular files, keyed by normalized path.
    files: BTreeMap<String, Content>,
    /// Non-file leaf entries (symlinks, submodules, unclassifiable entries).
    special: BTreeMap<String, EntryKind>,
    /// Changed files keyed by the `after` revision.
    changes: HashMap<String, Vec<String>>,
    pull_requests: HashMap<u64, Vec<String>>,
    /// Paths whose `find_content`/`list_directory` fail with a transport error.
    failures: HashMap<String, String>,
    change_failure: Option<String>,
    calls: Mutex<Vec<ScmCall>>,
}

impl MemoryScm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the working tree below `root`, skipping `.git` directories.
    ///
    /// Only directories up to `max_depth` (the root is 0) are walked, so the
    /// snapshot covers exactly what a tree scan with the same bound may list.
    /// Directories one level deeper are recorded as empty entries. File bodies
    /// are read lazily by `find_content`. Symbolic links are recorded as
    /// symlink entries and never followed.
    pub fn from_dir(root: &Path, max_depth: usize) -> Result<Self> {
        let mut scm = Self::new();
        let entry_depth = max_depth.saturating_add(1);
        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(entry_depth)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            let entry = entry?;
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let key = path::normalize(&relative.to_string_lossy());
            let file_type = entry.file_type();
            if file_type.is_symlink() {
                scm.special.insert(key, EntryKind::Symlink);
            } else if file_type.is_file() {
                scm.files
                    .insert(key, Content::OnDisk(entry.path().to_path_buf()));
            } else if file_type.is_dir() && entry.depth() == entry_depth {
                scm.special.insert(key, EntryKind::Directory);
            }
        }
        debug!(
            "indexed {} files below {} (max depth {})",
            scm.files.len(),
            root.display(),
            max_depth
        );
        Ok(scm)
    }

    /// Add or replace a regular file.
    pub fn with_file(mut self, file: &str, content: &str) -> Self {
        self.files.insert(
            path::normalize(file),
            Content::Loaded(content.as_bytes().to_vec()),
        );
        self
    }

    /// Add a non-file leaf entry such as a symlink or submodule.
    pub fn with_entry(mut self, entry: &str, kind: EntryKind) -> Self {
        self.special.insert(path::normalize(entry), kind);
        self
    }

    /// Changed files reported for builds whose `after` revision is `after`.
    pub fn with_changes(mut self, after: &str, files: &[&str]) -> Self {
        self.changes.insert(
            after.to_string(),
            files.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn with_pull_request(mut self, number: u64, files: &[&str]) -> Self {
        self.pull_requests
            .insert(number, files.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Make every call touching `target` fail with a transport error.
    pub fn with_failure(mut self, target: &str, message: &str) -> Self {
        self.failures
            .insert(path::normalize(target), message.to_string());
        self
    }

    /// Make the change listings fail with a transport error.
    pub fn with_change_failure(mut self, message: &str) -> Self {
        self.change_failure = Some(message.to_string());
        self
    }

    /// Number of regular files in the snapshot.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ScmCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Paths passed to `find_content`, in order.
    pub fn fetched_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ScmCall::FindContent(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Paths passed to `list_directory`, in order.
    pub fn listed_dirs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ScmCall::ListDirectory(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ScmCall) -> Result<()> {
        let mut calls = self.calls.lock().map_err(|_| Error::LockPoisoned {
            context: "MemoryScm call log".to_string(),
        })?;
        calls.push(call);
        Ok(())
    }

    fn check_failure(&self, operation: &str, target: &str) -> Result<()> {
        match self.failures.get(target) {
            Some(message) => Err(Error::scm(operation, format!("{}: {}", target, message))),
            None => Ok(()),
        }
    }

    fn is_directory(&self, dir: &str) -> bool {
        if dir == path::ROOT {
            return true;
        }
        let prefix = format!("{}/", dir);
        self.files.keys().any(|key| key.starts_with(&prefix))
            || self.special.keys().any(|key| key.starts_with(&prefix))
    }
}

impl ScmClient for MemoryScm {
    fn list_changes(&self, _repo: &Repo, range: &RevisionRange) -> Result<Vec<String>> {
        self.record(ScmCall::ListChanges {
            before: range.before.clone(),
            after: range.after.clone(),
        })?;
        if let Some(message) = &self.change_failure {
            return Err(Error::scm("list_changes", message.clone()));
        }
        Ok(self.changes.get(&range.after).cloned().unwrap_or_default())
    }

    fn list_pull_request_changes(&self, _repo: &Repo, number: u64) -> Result<Vec<String>> {
        self.record(ScmCall::ListPullRequestChanges(number))?;
        if let Some(message) = &self.change_failure {
            return Err(Error::scm("list_pull_request_changes", message.clone()));
        }
        self.pull_requests.get(&number).cloned().ok_or_else(|| {
            Error::scm(
                "list_pull_request_changes",
                format!("pull request {} not found", number),
            )
        })
    }

    fn find_content(&self, _repo: &Repo, file: &str, revision: &str) -> Result<Vec<u8>> {
        let file = path::normalize(file);
        self.record(ScmCall::FindContent(file.clone()))?;
        self.check_failure("find_content", &file)?;

        match self.files.get(&file) {
            Some(Content::Loaded(content)) => return Ok(content.clone()),
            Some(Content::OnDisk(source)) => return Ok(std::fs::read(source)?),
            None => {}
        }
        if self.special.contains_key(&file) || self.is_directory(&file) {
            return Err(Error::NotAFile {
                path: file,
                revision: revision.to_string(),
            });
        }
        Err(Error::FileNotFound {
            path: file,
            revision: revision.to_string(),
        })
    }

    fn list_directory(&self, _repo: &Repo, dir: &str, _revision: &str) -> Result<Vec<DirEntry>> {
        let dir = path::normalize(dir);
        self.record(ScmCall::ListDirectory(dir.clone()))?;
        self.check_failure("list_directory", &dir)?;

        let prefix = if dir == path::ROOT {
            path::ROOT.to_string()
        } else {
            format!("{}/", dir)
        };

        let leaves = self
            .files
            .keys()
            .map(|key| (key, EntryKind::File))
            .chain(self.special.iter().map(|(key, kind)| (key, *kind)));

        let mut children: BTreeMap<String, DirEntry> = BTreeMap::new();
        for (key, kind) in leaves {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            let (name, kind) = match rest.split_once('/') {
                Some((name, _)) => (name, EntryKind::Directory),
                None => (rest, kind),
            };
            if name.is_empty() {
                continue;
            }
            children
                .entry(name.to_string())
                .or_insert_with(|| DirEntry::new(name, &path::join(&dir, name), kind));
        }
        Ok(children.into_values().collect())
    }
}
