//! Path manipulation utilities for repository paths
//!
//! Repository paths in this crate are always root-relative absolute strings
//! using `/` separators (`/services/api/.pipeline.yml`), independent of the
//! host platform. SCM collaborators receive these paths unchanged.

/// The repository root.
pub const ROOT: &str = "/";

/// Normalize a repository path to its root-relative absolute form.
///
/// Empty and `.` segments are dropped, `..` pops the previous segment and
/// never escapes the root, and a trailing slash is removed.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        ROOT.to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Parent directory of a normalized path, or `None` for the root.
pub fn parent(path: &str) -> Option<String> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT.to_string()),
        Some(idx) => Some(path[..idx].to_string()),
        None => Some(ROOT.to_string()),
    }
}

/// Join a relative name onto a normalized directory.
pub fn join(dir: &str, name: &str) -> String {
    normalize(&format!("{}/{}", dir, name))
}

/// Last segment of a normalized path (empty for the root).
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

/// Path without its leading slash, as git and most SCM APIs expect it.
pub fn relative(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Directories from the one containing `changed_file` up to the root,
/// deepest first.
///
/// A changed path that normalizes to the root yields the root alone.
pub fn containing_dirs(changed_file: &str) -> Vec<String> {
    let file = normalize(changed_file);
    let mut dirs = Vec::new();
    let mut current = parent(&file).unwrap_or_else(|| ROOT.to_string());
    loop {
        dirs.push(current.clone());
        match parent(&current) {
            Some(up) => current = up,
            None => break,
        }
    }
    dirs
}

/// Number of directory levels below the root (`/` is 0, `/a` is 1).
pub fn depth(path: &str) -> usize {
    relative(path).split('/').filter(|s| !s.is_empty()).count()
}
