//! # Resolver Settings
//!
//! Settings control how a resolution behaves: whether every matching
//! configuration is merged (`concat`) or only the first, whether builds with
//! no changed files fall back to a full tree scan (`fallback`), how deep that
//! scan goes, and the budget bounding each resolution.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. built-in defaults (see [`crate::defaults`]),
//! 2. an optional YAML settings file,
//! 3. command-line flags and their environment variables.
//!
//! ```yaml
//! concat: true
//! fallback: false
//! max_depth: 2
//! timeout_seconds: 60
//! max_scm_calls: 1000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_SCM_CALLS, DEFAULT_TIMEOUT_SECONDS, MAX_SCM_CALLS_LIMIT,
    MAX_TIMEOUT_SECONDS,
};
use crate::error::{Error, Result};

/// Behavior of a [`Resolver`](crate::resolver::Resolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Merge every matching configuration instead of only the first.
    pub concat: bool,
    /// Scan the tree when a build reports no changed files.
    pub fallback: bool,
    /// Deepest directory level the scanner lists.
    pub max_depth: usize,
    /// Wall-clock budget of one resolution.
    pub timeout_seconds: u64,
    /// SCM calls one resolution may make.
    pub max_scm_calls: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            concat: false,
            fallback: false,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_scm_calls: DEFAULT_MAX_SCM_CALLS,
        }
    }
}

/// Values that replace file or default settings when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub concat: Option<bool>,
    pub fallback: Option<bool>,
    pub max_depth: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub max_scm_calls: Option<usize>,
}

impl Settings {
    /// Parse settings from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::InvalidSettings {
            message: e.to_string(),
        })
    }

    /// Read settings from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::InvalidSettings {
            message: format!("unable to read {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Defaults, then the optional file, then the overrides; validated.
    pub fn load(path: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let settings = base.with_overrides(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(concat) = overrides.concat {
            self.concat = concat;
        }
        if let Some(fallback) = overrides.fallback {
            self.fallback = fallback;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
        if let Some(timeout_seconds) = overrides.timeout_seconds {
            self.timeout_seconds = timeout_seconds;
        }
        if let Some(max_scm_calls) = overrides.max_scm_calls {
            self.max_scm_calls = max_scm_calls;
        }
        self
    }

    /// Check the budget bounds.
    pub fn validate(&self) -> Result<()> {
        // timeout_seconds must be in (0, MAX_TIMEOUT_SECONDS]
        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(Error::InvalidSettings {
                message: format!(
                    "timeout_seconds must be in (0, {}], got {}",
                    MAX_TIMEOUT_SECONDS, self.timeout_seconds
                ),
            });
        }

        // max_scm_calls must be in (0, MAX_SCM_CALLS_LIMIT]
        if self.max_scm_calls == 0 || self.max_scm_calls > MAX_SCM_CALLS_LIMIT {
            return Err(Error::InvalidSettings {
                message: format!(
                    "max_scm_calls must be in (0, {}], got {}",
                    MAX_SCM_CALLS_LIMIT, self.max_scm_calls
                ),
            });
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
