//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config("svc", configs::SVC);
//!     fixture.command().arg("scan").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Pipeline configuration snippets for testing.
#[allow(dead_code)]
pub mod configs {
    pub const ROOT: &str = "kind: pipeline\nname: root\nsteps:\n  - name: lint\n    image: golang\n";

    pub const SVC: &str = "kind: pipeline\nname: svc\nsteps:\n  - name: test\n    image: golang\n";

    pub const API: &str = "kind: pipeline\nname: api\n...\n";

    /// Has a `name` but no `kind`.
    pub const MISSING_KIND: &str = "name: broken\nsteps: []\n";

    pub const INVALID_YAML: &str = "kind: [unclosed\n";
}

/// Whether the `git` binary can be run.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

/// A temporary working tree, optionally under git.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.pipeline.yml` in `dir` (`""` for the root).
    pub fn with_config(self, dir: &str, content: &str) -> Self {
        let path = if dir.is_empty() {
            ".pipeline.yml".to_string()
        } else {
            format!("{}/.pipeline.yml", dir)
        };
        self.with_file(&path, content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Run git in the fixture directory and return its trimmed stdout.
    #[allow(dead_code)]
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(output.status.success(), "git {:?} failed", args);
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Initialize a repository; call before the first [`commit`](Self::commit).
    #[allow(dead_code)]
    pub fn git_init(self) -> Self {
        self.git(&["init", "-q"]);
        self
    }

    /// Commit everything in the working tree and return the commit sha.
    #[allow(dead_code)]
    pub fn commit(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// Write a JSON build event file and return its path.
    #[allow(dead_code)]
    pub fn write_event(&self, trigger: &str, r#ref: &str, before: &str, after: &str) -> String {
        let event = serde_json::json!({
            "repo": { "namespace": "octocat", "name": "monorepo" },
            "build": {
                "trigger": trigger,
                "ref": r#ref,
                "before": before,
                "after": after,
            }
        });
        let path = self.temp_dir.child("event.json");
        path.write_str(&event.to_string())
            .expect("Failed to write event");
        path.path().display().to_string()
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pipeline-tree");
        cmd.current_dir(self.path())
            .env_remove("PLUGIN_CONCAT")
            .env_remove("PLUGIN_FALLBACK")
            .env_remove("PLUGIN_MAXDEPTH")
            .env_remove("PLUGIN_DEBUG")
            .env_remove("PIPELINE_TREE_SETTINGS");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
