//! # Resolution
//!
//! [`Resolver::resolve`] is the entry point the hosting layer calls. It ties
//! the pieces together:
//!
//! 1. **Change set** ([`crate::changes`]): which files the build touched.
//! 2. **Lookup**:
//!    - changed files: walk each file's ancestors ([`crate::locator`]);
//!    - scheduled builds: scan the tree ([`crate::scanner`]) unconditionally;
//!    - no changes: scan the tree only when `fallback` is enabled.
//! 3. **Emit** ([`crate::document`]): finalize the merged document.
//!
//! The result is all-or-nothing. Either a complete document is returned, or
//! an error: [`Error::NotFound`] when nothing was located,
//! [`Error::MalformedConfig`] for a present-but-invalid file, or whatever the
//! SCM collaborator or the request budget reported.

use log::{info, warn};

use crate::changes::{resolve_changes, ChangeSet};
use crate::error::{Error, Result};
use crate::event::BuildEvent;
use crate::locator::locate;
use crate::request::RequestContext;
use crate::scanner::{scan, ScanOptions};
use crate::scm::ScmClient;
use crate::settings::Settings;

/// Resolves build events to pipeline documents through an SCM collaborator.
///
/// A resolver holds no per-request state and can serve concurrent requests
/// when its collaborator can.
#[derive(Debug)]
pub struct Resolver<S> {
    scm: S,
    settings: Settings,
}

impl<S: ScmClient> Resolver<S> {
    pub fn new(scm: S, settings: Settings) -> Self {
        Self { scm, settings }
    }

    pub fn scm(&self) -> &S {
        &self.scm
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve `event` to its pipeline document.
    pub fn resolve(&self, event: &BuildEvent) -> Result<String> {
        event.validate()?;
        let mut ctx = RequestContext::new(event, &self.settings);
        info!("{} {} started", ctx.id(), event.repo.slug());

        let result = self.resolve_in(&mut ctx);
        match &result {
            Ok(_) => info!(
                "{} finished after {} scm calls",
                ctx.id(),
                ctx.budget().calls()
            ),
            Err(e) => warn!("{} failed: {}", ctx.id(), e),
        }
        result
    }

    /// Change set of `event`, without looking up any configuration.
    pub fn changes(&self, event: &BuildEvent) -> Result<ChangeSet> {
        event.validate()?;
        let mut ctx = RequestContext::new(event, &self.settings);
        resolve_changes(&self.scm, &mut ctx)
    }

    fn resolve_in(&self, ctx: &mut RequestContext<'_>) -> Result<String> {
        let scan_options = ScanOptions {
            max_depth: self.settings.max_depth,
            concat: self.settings.concat,
        };

        let document = match resolve_changes(&self.scm, ctx)? {
            ChangeSet::Files(files) => locate(&self.scm, ctx, &files, self.settings.concat)?,
            ChangeSet::FullScan => {
                warn!("{} @cron, rebuilding all", ctx.id());
                scan(&self.scm, ctx, scan_options)?
            }
            ChangeSet::NoChanges if self.settings.fallback => {
                warn!(
                    "{} no changed files and fallback enabled, rebuilding all",
                    ctx.id()
                );
                scan(&self.scm, ctx, scan_options)?
            }
            ChangeSet::NoChanges => {
                info!("{} no changed files and fallback disabled", ctx.id());
                return Err(self.not_found(ctx));
            }
        };

        let output = document.finalize();
        if output.is_empty() {
            return Err(self.not_found(ctx));
        }
        Ok(output)
    }

    fn not_found(&self, ctx: &RequestContext<'_>) -> Error {
        Error::NotFound {
            repo: ctx.repo().slug(),
            config: ctx.config_name().to_string(),
        }
    }
}
