//! The check-in/check-out state machine.
//!
//! Every command is applied to the timesheet as loaded at the start of the
//! invocation. Commands whose preconditions do not hold report an [`Outcome`]
//! and leave the timesheet untouched; only mutating outcomes are saved.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entry::Entry;
use crate::offset::resolve_offset;
use crate::store::EntryStore;
use crate::timesheet::Timesheet;

/// Whether time tracking is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No running entry.
    Idle,
    /// The last entry has no end time.
    Running,
}

impl State {
    pub fn of(timesheet: &Timesheet) -> Self {
        if timesheet.running().is_some() {
            Self::Running
        } else {
            Self::Idle
        }
    }
}

/// A zero-based entry position as the user wrote it.
///
/// Any non-empty run of ASCII digits is an index. Indices too large for
/// `usize` have no position and never match an entry. The original text is
/// kept for messages, so `007` is reported as `007`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryIndex {
    position: Option<usize>,
    raw: String,
}

/// The token is not a run of ASCII digits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not an entry index: {0}")]
pub struct InvalidEntryIndex(pub String);

impl EntryIndex {
    /// Returns `None` unless `token` is a non-empty run of ASCII digits.
    pub fn parse(token: &str) -> Option<Self> {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            position: token.parse().ok(),
            raw: token.to_string(),
        })
    }

    /// The position in the timesheet, or `None` if it does not fit in `usize`.
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<usize> for EntryIndex {
    fn from(position: usize) -> Self {
        Self {
            position: Some(position),
            raw: position.to_string(),
        }
    }
}

impl FromStr for EntryIndex {
    type Err = InvalidEntryIndex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidEntryIndex(s.to_string()))
    }
}

impl fmt::Display for EntryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Which entry an edit applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Zero-based position in the timesheet.
    ByIndex(EntryIndex),
    /// The most recently created entry.
    ByLastEntry,
}

/// A single tracking operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CheckIn {
        offset: Option<String>,
        message: Option<String>,
    },
    CheckOut {
        offset: Option<String>,
        message: Option<String>,
    },
    Edit {
        target: Target,
        message: Option<String>,
    },
    Delete {
        index: EntryIndex,
    },
}

/// Result of applying a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    CheckedIn,
    AlreadyRunning,
    CheckedOut,
    NotRunning,
    /// Check-out would end the running entry before it started.
    EndBeforeStart,
    EntryChanged,
    EntryRemoved,
    EntryNotFound(EntryIndex),
}

impl Outcome {
    /// Returns `true` if the timesheet was changed and must be saved.
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CheckedIn | Self::CheckedOut | Self::EntryChanged | Self::EntryRemoved
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckedIn => write!(f, "Checked in"),
            Self::AlreadyRunning => write!(f, "Time tracking already running!"),
            Self::CheckedOut => write!(f, "Checked out"),
            Self::NotRunning => write!(f, "Time tracking not running!"),
            Self::EndBeforeStart => write!(f, "Check-out time is before check-in time!"),
            Self::EntryChanged => write!(f, "Entry changed"),
            Self::EntryRemoved => write!(f, "Entry removed"),
            Self::EntryNotFound(index) => write!(f, "Entry {index} not found!"),
        }
    }
}

/// Applies `command` to `timesheet` in place.
///
/// The timesheet is only modified when the returned outcome is a mutation.
pub fn apply(timesheet: &mut Timesheet, command: Command, now: DateTime<Utc>) -> Outcome {
    match command {
        Command::CheckIn { offset, message } => check_in(timesheet, offset.as_deref(), message, now),
        Command::CheckOut { offset, message } => {
            check_out(timesheet, offset.as_deref(), message, now)
        }
        Command::Edit { target, message } => edit(timesheet, target, message),
        Command::Delete { index } => delete(timesheet, index),
    }
}

fn check_in(
    timesheet: &mut Timesheet,
    offset: Option<&str>,
    message: Option<String>,
    now: DateTime<Utc>,
) -> Outcome {
    if State::of(timesheet) == State::Running {
        return Outcome::AlreadyRunning;
    }
    let start = resolve_offset(offset, now);
    tracing::debug!(%start, ?message, "checking in");
    timesheet.append(Entry::started_at(start, message));
    Outcome::CheckedIn
}

fn check_out(
    timesheet: &mut Timesheet,
    offset: Option<&str>,
    message: Option<String>,
    now: DateTime<Utc>,
) -> Outcome {
    let Some(running) = timesheet.running() else {
        return Outcome::NotRunning;
    };
    let end = resolve_offset(offset, now);
    if running.start.is_some_and(|start| end < start) {
        tracing::debug!(%end, start = ?running.start, "refusing to check out before check-in");
        return Outcome::EndBeforeStart;
    }

    let mut closed = running.clone();
    closed.end = Some(end);
    if message.is_some() {
        closed.message = message;
    }
    tracing::debug!(%end, message = ?closed.message, "checking out");
    match timesheet.replace_last(closed) {
        Ok(_) => Outcome::CheckedOut,
        Err(_) => Outcome::NotRunning,
    }
}

fn edit(timesheet: &mut Timesheet, target: Target, message: Option<String>) -> Outcome {
    let index = match target {
        Target::ByIndex(index) => index,
        Target::ByLastEntry => EntryIndex::from(timesheet.len().saturating_sub(1)),
    };
    let Some((position, entry)) = index
        .position()
        .and_then(|position| timesheet.at(position).map(|entry| (position, entry)))
    else {
        return Outcome::EntryNotFound(index);
    };

    let mut edited = entry.clone();
    edited.message = message;
    tracing::debug!(position, message = ?edited.message, "editing entry");
    match timesheet.replace_at(position, edited) {
        Ok(_) => Outcome::EntryChanged,
        Err(_) => Outcome::EntryNotFound(index),
    }
}

fn delete(timesheet: &mut Timesheet, index: EntryIndex) -> Outcome {
    let Some(position) = index.position() else {
        return Outcome::EntryNotFound(index);
    };
    match timesheet.remove_at(position) {
        Ok(removed) => {
            tracing::debug!(position, ?removed, "deleted entry");
            Outcome::EntryRemoved
        }
        Err(_) => Outcome::EntryNotFound(index),
    }
}

/// Runs commands against a store: load, apply, save on mutation.
#[derive(Debug)]
pub struct Tracker<S> {
    store: S,
}

impl<S: EntryStore> Tracker<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads the timesheet, applies `command` and saves exactly once if it changed.
    pub fn run(&self, command: Command, now: DateTime<Utc>) -> Result<Outcome, S::Error> {
        let mut timesheet = self.store.load()?;
        let outcome = apply(&mut timesheet, command, now);
        if outcome.is_mutation() {
            self.store.save(&timesheet)?;
        }
        tracing::debug!(%outcome, entries = timesheet.len(), "command finished");
        Ok(outcome)
    }
}
