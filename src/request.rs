//! Per-resolution request state
//!
//! A [`RequestContext`] lives for exactly one resolution. It carries the
//! event being resolved, a request id that prefixes every log line, and the
//! [`Budget`] each SCM call is charged against. Nothing in it is shared
//! between requests.

use uuid::Uuid;

use crate::budget::Budget;
use crate::error::Result;
use crate::event::{BuildEvent, Repo};
use crate::settings::Settings;

#[derive(Debug)]
pub struct RequestContext<'a> {
    id: Uuid,
    event: &'a BuildEvent,
    budget: Budget,
}

impl<'a> RequestContext<'a> {
    pub fn new(event: &'a BuildEvent, settings: &Settings) -> Self {
        Self::with_budget(event, Budget::from_settings(settings))
    }

    pub fn with_budget(event: &'a BuildEvent, budget: Budget) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            budget,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event(&self) -> &'a BuildEvent {
        self.event
    }

    pub fn repo(&self) -> &'a Repo {
        &self.event.repo
    }

    /// Configuration file name looked up in each directory.
    pub fn config_name(&self) -> &'a str {
        &self.event.repo.config
    }

    /// Revision files are read at.
    pub fn revision(&self) -> &'a str {
        &self.event.build.after
    }

    /// Charge one SCM call to the request budget.
    pub fn charge(&mut self, operation: &str) -> Result<()> {
        self.budget.charge(operation)
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }
}
