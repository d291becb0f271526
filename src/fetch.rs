//! # Fetch and Validate
//!
//! Loads one candidate configuration file and applies the minimal structural
//! check: the leading YAML document must be a mapping with non-empty `kind`
//! and `name` fields.
//!
//! The outcome is three-way:
//!
//! - **found**: the raw, unmodified content is returned;
//! - **absent**: the SCM has no regular file at the path. The caller skips
//!   the candidate and moves on;
//! - **error**: either the file exists but fails validation
//!   ([`Error::MalformedConfig`], a user authoring error that must not be
//!   mistaken for absence), or the SCM call itself failed. Both abort the
//!   resolution.

use log::{debug, error, info};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::request::RequestContext;
use crate::scm::ScmClient;

/// The leading structural fields of a pipeline document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PipelineHeader {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

/// A fetched configuration that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Candidate path the content came from.
    pub path: String,
    pub content: String,
    pub header: PipelineHeader,
}

/// Result of fetching one candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(ValidatedConfig),
    Absent,
}

/// Check the leading document of `content`.
///
/// `path` is only used to name the file in the error.
pub fn validate_content(path: &str, content: &str) -> Result<PipelineHeader> {
    let malformed = |message: String| Error::MalformedConfig {
        path: path.to_string(),
        message,
    };

    let Some(document) = serde_yaml::Deserializer::from_str(content).next() else {
        return Err(malformed("file contains no YAML document".to_string()));
    };
    let header = PipelineHeader::deserialize(document)
        .map_err(|e| malformed(format!("unable to parse yml file: {}", e)))?;

    if header.kind.trim().is_empty() || header.name.trim().is_empty() {
        return Err(malformed("missing 'kind' or 'name'".to_string()));
    }
    Ok(header)
}

/// Fetch `path` at the request revision and validate it.
pub fn fetch_config(
    scm: &dyn ScmClient,
    ctx: &mut RequestContext<'_>,
    path: &str,
) -> Result<FetchOutcome> {
    let repo = ctx.repo();
    debug!("{} checking {} {}", ctx.id(), repo.slug(), path);

    ctx.charge(&format!("find_content {}", path))?;
    let bytes = match scm.find_content(repo, path, ctx.revision()) {
        Ok(bytes) => bytes,
        Err(e) if e.is_absent() => {
            debug!("{} skipping: unable to load file: {} {}", ctx.id(), path, e);
            return Ok(FetchOutcome::Absent);
        }
        Err(e) => return Err(e),
    };

    let content = String::from_utf8(bytes).map_err(|e| {
        error!("{} {} is not valid UTF-8", ctx.id(), path);
        Error::MalformedConfig {
            path: path.to_string(),
            message: format!("not valid UTF-8: {}", e),
        }
    })?;

    let header = validate_content(path, &content).inspect_err(|e| {
        error!("{} {}", ctx.id(), e);
    })?;

    info!("{} found {} {}", ctx.id(), repo.slug(), path);
    Ok(FetchOutcome::Found(ValidatedConfig {
        path: path.to_string(),
        content,
        header,
    }))
}
