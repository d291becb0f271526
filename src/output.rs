//! # Terminal Output
//!
//! Status markers for human-facing command output. Markers are emoji when
//! color is enabled and bracketed text (`[OK]`, `[ERR]`) otherwise, so output
//! piped into build logs stays plain.
//!
//! Color is decided from the `--color` flag first (`always`, `never`,
//! `auto`). In `auto` mode the usual environment conventions apply:
//! `NO_COLOR`, `CLICOLOR=0`, `CLICOLOR_FORCE` and `TERM=dumb`, then whether
//! stdout is a color-capable terminal.
//!
//! Resolved pipeline documents are never decorated.

use std::env;

/// Whether status output may use color and emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

/// A status marker for one line of command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

impl Status {
    fn markers(self) -> (&'static str, &'static str) {
        match self {
            Status::Ok => ("✅", "[OK]"),
            Status::Error => ("❌", "[ERR]"),
        }
    }
}

impl OutputConfig {
    /// Decide from the `--color` flag value and the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even when empty.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Marker for `status` under this configuration.
    pub fn marker(&self, status: Status) -> &'static str {
        let (emoji, plain) = status.markers();
        if self.use_color {
            emoji
        } else {
            plain
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
