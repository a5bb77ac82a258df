//! Per-session completion usage counter

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format used when showing the last-used time
pub const LAST_USED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Count of successful completion calls and when the latest one happened
///
/// Only successful calls are recorded; failures leave both fields untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub count: u64,
    pub last_used: Option<DateTime<Local>>,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful call at `at`
    pub fn record_success(&mut self, at: DateTime<Local>) {
        self.count += 1;
        self.last_used = Some(at);
    }

    /// Last-used time formatted for display, if any call has succeeded
    pub fn last_used_display(&self) -> Option<String> {
        self.last_used
            .map(|ts| ts.format(LAST_USED_FORMAT).to_string())
    }
}
