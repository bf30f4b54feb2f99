//! Core domain logic for punch.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries and the ordered timesheet they live in
//! - Relative time offsets (`2d3h25m`, `+1h40m`)
//! - The check-in/check-out state machine and its store seam

pub mod engine;
mod entry;
pub mod offset;
mod store;
mod timesheet;

pub use engine::{
    Command, EntryIndex, InvalidEntryIndex, Outcome, State, Target, Tracker, apply,
};
pub use entry::Entry;
pub use offset::{Direction, Offset, looks_like_offset, resolve_offset};
pub use store::{EntryStore, MemoryStore};
pub use timesheet::{Timesheet, TimesheetError};
