//! Per-resolution budget
//!
//! A recursive scan over a remote SCM can issue an unbounded number of
//! listing and fetch calls. Every SCM call a resolution makes is charged to a
//! [`Budget`] first; the call is refused once the wall-clock deadline has
//! passed or the call cap is used up.
//!
//! The budget only checks. It never interrupts a call already in flight.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Deadline and call cap for one resolution.
#[derive(Debug)]
pub struct Budget {
    limit: Duration,
    max_calls: usize,
    start_time: Instant,
    calls: usize,
}

impl Budget {
    pub fn new(limit: Duration, max_calls: usize) -> Self {
        Self {
            limit,
            max_calls,
            start_time: Instant::now(),
            calls: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.timeout(), settings.max_scm_calls)
    }

    /// Account for one SCM call described by `operation`.
    pub fn charge(&mut self, operation: &str) -> Result<()> {
        let elapsed = self.start_time.elapsed();
        if elapsed > self.limit {
            return Err(Error::DeadlineExceeded {
                elapsed,
                limit: self.limit,
            });
        }
        if self.calls >= self.max_calls {
            return Err(Error::ScmCallLimit {
                limit: self.max_calls,
                operation: operation.to_string(),
            });
        }
        self.calls += 1;
        Ok(())
    }

    /// SCM calls charged so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
