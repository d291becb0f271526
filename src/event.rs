//! # Build Events
//!
//! A [`BuildEvent`] is the input to a resolution: which repository, which
//! revisions, and what triggered the build. Events are immutable once built
//! and can be loaded from YAML or JSON files.
//!
//! ```
//! use pipeline_tree::event::{BuildEvent, Trigger};
//!
//! let event: BuildEvent = serde_yaml::from_str(r#"
//! repo:
//!   namespace: octocat
//!   name: monorepo
//! build:
//!   trigger: "@hook"
//!   ref: refs/heads/main
//!   before: "1111111111111111111111111111111111111111"
//!   after: "2222222222222222222222222222222222222222"
//! "#).unwrap();
//!
//! assert_eq!(event.build.trigger, Trigger::Push);
//! assert_eq!(event.repo.config, ".pipeline.yml");
//! assert_eq!(event.repo.slug(), "octocat/monorepo");
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_CONFIG_NAME;
use crate::error::{Error, Result};

/// What caused the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// A push or other webhook-driven build.
    #[serde(alias = "@hook")]
    Push,
    /// A pull/merge request build.
    PullRequest,
    /// A scheduled build.
    #[serde(alias = "@cron")]
    Cron,
}

/// Repository identity and its configured pipeline file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub namespace: String,
    pub name: String,
    /// Configuration file name looked up in each directory.
    #[serde(default = "default_config_name")]
    pub config: String,
}

fn default_config_name() -> String {
    DEFAULT_CONFIG_NAME.to_string()
}

impl Repo {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            config: default_config_name(),
        }
    }

    /// `namespace/name`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Revision data of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub trigger: Trigger,
    #[serde(rename = "ref", default)]
    pub r#ref: String,
    #[serde(default)]
    pub before: Option<String>,
    pub after: String,
}

/// Two revisions to diff. `before` may be a synthesized `<after>~1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub before: String,
    pub after: String,
}

/// A build trigger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEvent {
    pub repo: Repo,
    pub build: Build,
}

static PULL_REQUEST_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^refs/(?:pull|merge-requests)/([^/]+)(?:/|$)").expect("static regex")
});

impl BuildEvent {
    /// Load an event from a `.json` file, or from YAML for any other extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let event: BuildEvent = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        event.validate()?;
        Ok(event)
    }

    /// Reject events no resolution could use.
    pub fn validate(&self) -> Result<()> {
        if self.repo.config.trim().is_empty() {
            return Err(Error::InvalidEvent {
                message: "repository config file name is empty".to_string(),
            });
        }
        if self.build.after.trim().is_empty() {
            return Err(Error::InvalidEvent {
                message: "build 'after' revision is empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn is_scheduled(&self) -> bool {
        self.build.trigger == Trigger::Cron
    }

    /// Pull/merge request number carried by the build ref.
    ///
    /// `Ok(None)` for refs that are not pull request refs; an error for pull
    /// request refs whose number does not parse.
    pub fn pull_request_number(&self) -> Result<Option<u64>> {
        let Some(captures) = PULL_REQUEST_REF.captures(&self.build.r#ref) else {
            return Ok(None);
        };
        let raw = &captures[1];
        raw.parse::<u64>()
            .map(Some)
            .map_err(|_| Error::InvalidEvent {
                message: format!(
                    "unable to get pull request id from ref '{}'",
                    self.build.r#ref
                ),
            })
    }

    /// Range to diff for non pull request builds.
    ///
    /// A missing, empty or all-zero `before` falls back to the parent of
    /// `after`.
    pub fn revision_range(&self) -> RevisionRange {
        let before = match self.build.before.as_deref().map(str::trim) {
            Some(before) if !before.is_empty() && !before.chars().all(|c| c == '0') => {
                before.to_string()
            }
            _ => format!("{}~1", self.build.after),
        };
        RevisionRange {
            before,
            after: self.build.after.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(trigger: Trigger, r#ref: &str, before: Option<&str>) -> BuildEvent {
        BuildEvent {
            repo: Repo::new("octocat", "monorepo"),
            build: Build {
                trigger,
                r#ref: r#ref.to_string(),
                before: before.map(str::to_string),
                after: "abc123".to_string(),
            },
        }
    }

    #[test]
    fn test_trigger_aliases() {
        let cron: Trigger = serde_yaml::from_str("\"@cron\"").unwrap();
        assert_eq!(cron, Trigger::Cron);
        let hook: Trigger = serde_yaml::from_str("\"@hook\"").unwrap();
        assert_eq!(hook, Trigger::Push);
        let pr: Trigger = serde_yaml::from_str("pull_request").unwrap();
        assert_eq!(pr, Trigger::PullRequest);
    }

    #[test]
    fn test_pull_request_number() {
        let e = event(Trigger::PullRequest, "refs/pull/42/head", None);
        assert_eq!(e.pull_request_number().unwrap(), Some(42));

        let e = event(Trigger::PullRequest, "refs/merge-requests/7/head", None);
        assert_eq!(e.pull_request_number().unwrap(), Some(7));

        let e = event(Trigger::Push, "refs/heads/main", None);
        assert_eq!(e.pull_request_number().unwrap(), None);
    }

    #[test]
    fn test_pull_request_number_rejects_garbage() {
        let e = event(Trigger::PullRequest, "refs/pull/abc/head", None);
        let err = e.pull_request_number().unwrap_err();
        assert!(err.to_string().contains("unable to get pull request id"));
    }

    #[test]
    fn test_revision_range_uses_before() {
        let e = event(Trigger::Push, "refs/heads/main", Some("def456"));
        let range = e.revision_range();
        assert_eq!(range.before, "def456");
        assert_eq!(range.after, "abc123");
    }

    #[test]
    fn test_revision_range_synthesizes_parent() {
        for before in [None, Some(""), Some("0000000000000000000000000000000000000000")] {
            let e = event(Trigger::Push, "refs/heads/main", before);
            assert_eq!(e.revision_range().before, "abc123~1");
        }
    }

    #[test]
    fn test_validate_rejects_empty_config_name() {
        let mut e = event(Trigger::Push, "refs/heads/main", None);
        e.repo.config = "  ".to_string();
        assert!(matches!(e.validate(), Err(Error::InvalidEvent { .. })));
    }

    #[test]
    fn test_from_file_json_and_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let json = dir.path().join("event.json");
        std::fs::write(
            &json,
            r#"{"repo":{"namespace":"o","name":"r","config":".ci.yml"},
                "build":{"trigger":"@cron","ref":"refs/heads/main","after":"abc"}}"#,
        )
        .unwrap();
        let e = BuildEvent::from_file(&json).unwrap();
        assert!(e.is_scheduled());
        assert_eq!(e.repo.config, ".ci.yml");

        let yaml = dir.path().join("event.yaml");
        std::fs::write(
            &yaml,
            "repo: {namespace: o, name: r}\nbuild: {trigger: push, after: abc}\n",
        )
        .unwrap();
        let e = BuildEvent::from_file(&yaml).unwrap();
        assert_eq!(e.build.trigger, Trigger::Push);
        assert_eq!(e.build.r#ref, "");
    }
}
