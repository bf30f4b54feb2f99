//! The ordered sequence of entries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::Entry;

/// Errors from timesheet transforms and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimesheetError {
    /// No entry exists at the requested position.
    #[error("entry {index} not found")]
    EntryNotFound { index: usize },

    /// A stored entry has no start time.
    #[error("entry {index} has no start time")]
    MissingStart { index: usize },

    /// A running entry is followed by other entries.
    #[error("entry {index} is running but is not the last entry")]
    RunningNotLast { index: usize },

    /// A stored entry ends before it starts.
    #[error("entry {index} ends before it starts")]
    EndBeforeStart { index: usize },
}

/// Entries in creation order.
///
/// The order is the order in which entries were checked in, which is not
/// necessarily sorted by time once entries have been edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timesheet {
    entries: Vec<Entry>,
}

impl Timesheet {
    /// Creates an empty timesheet.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently appended entry.
    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn at(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// The running entry, if tracking is in progress.
    pub fn running(&self) -> Option<&Entry> {
        self.last().filter(|entry| entry.is_running())
    }

    pub fn append(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Replaces the last entry, returning the previous one.
    pub fn replace_last(&mut self, entry: Entry) -> Result<Entry, TimesheetError> {
        let index = self
            .entries
            .len()
            .checked_sub(1)
            .ok_or(TimesheetError::EntryNotFound { index: 0 })?;
        self.replace_at(index, entry)
    }

    /// Replaces the entry at `index`, returning the previous one.
    pub fn replace_at(&mut self, index: usize, entry: Entry) -> Result<Entry, TimesheetError> {
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(TimesheetError::EntryNotFound { index })?;
        Ok(std::mem::replace(slot, entry))
    }

    /// Removes the entry at `index`. Later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Entry, TimesheetError> {
        if index >= self.entries.len() {
            return Err(TimesheetError::EntryNotFound { index });
        }
        Ok(self.entries.remove(index))
    }

    /// Checks the invariants every persisted timesheet must satisfy.
    pub fn validate(&self) -> Result<(), TimesheetError> {
        let last = self.entries.len().saturating_sub(1);
        for (index, entry) in self.entries.iter().enumerate() {
            let Some(start) = entry.start else {
                return Err(TimesheetError::MissingStart { index });
            };
            match entry.end {
                None if index != last => return Err(TimesheetError::RunningNotLast { index }),
                Some(end) if end < start => return Err(TimesheetError::EndBeforeStart { index }),
                _ => {}
            }
        }
        Ok(())
    }
}

impl From<Vec<Entry>> for Timesheet {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}
