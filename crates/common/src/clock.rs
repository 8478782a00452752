//! Timing utilities for job tracking.
//!
//! - Wall-clock timestamps for user-visible job log lines
//! - A poll schedule that switches between the nominal interval and a
//!   backoff interval depending on whether the last query succeeded

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::PollingConfig;

/// Current wall-clock time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp the way job log lines display it (`HH:MM:SS`).
pub fn log_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Delay controller for status polling.
///
/// Starts at the nominal interval. A failed query switches to the backoff
/// interval until the next successful query.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    interval: Duration,
    backoff: Duration,
    consecutive_failures: u32,
}

impl PollSchedule {
    pub fn new(interval: Duration, backoff: Duration) -> Self {
        Self {
            interval,
            backoff,
            consecutive_failures: 0,
        }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(config.interval(), config.backoff())
    }

    /// Record a successful query. Returns true if this ends a failure streak.
    pub fn record_success(&mut self) -> bool {
        let recovered = self.consecutive_failures > 0;
        self.consecutive_failures = 0;
        recovered
    }

    /// Record a failed query. Returns true if this starts a failure streak.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.consecutive_failures == 1
    }

    /// Delay before the next scheduled query.
    pub fn next_delay(&self) -> Duration {
        if self.consecutive_failures > 0 {
            self.backoff
        } else {
            self.interval
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
