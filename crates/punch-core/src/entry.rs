//! Timed activity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timed activity record.
///
/// Timestamps are persisted as integer epoch seconds. An entry without an
/// `end` is the running entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// When the entry was checked in.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<DateTime<Utc>>,

    /// When the entry was checked out.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<DateTime<Utc>>,

    /// Free-form description of the activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Entry {
    /// Creates a running entry starting at `start`.
    pub fn started_at(start: DateTime<Utc>, message: Option<String>) -> Self {
        Self {
            start: Some(start),
            end: None,
            message,
        }
    }

    /// Returns `true` if the entry has not been checked out.
    pub const fn is_running(&self) -> bool {
        self.end.is_none()
    }

    /// Elapsed time between start and end, or between start and `now` while running.
    pub fn duration(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let start = self.start?;
        Some(self.end.unwrap_or(now) - start)
    }
}
