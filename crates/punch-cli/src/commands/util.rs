//! Shared utilities for CLI commands.
//!
//! Positional arguments are classified here, once, into the typed
//! [`Command`] the tracking engine understands.

use chrono::Duration;
use punch_core::{Command, EntryIndex, Target, looks_like_offset};

/// Joins message words with single spaces; no words means no message.
fn join_message(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Splits `[offset] [message...]` arguments.
///
/// The first argument is an offset only if the whole word is written as one
/// (`20m`, `+1h40m`); anything else starts the message.
pub fn split_offset(args: &[String]) -> (Option<String>, Option<String>) {
    match args.split_first() {
        Some((first, rest)) if looks_like_offset(first) => (Some(first.clone()), join_message(rest)),
        _ => (None, join_message(args)),
    }
}

/// Splits `[index] [message...]` arguments for `edit`.
///
/// The first argument is a target index only if it is made entirely of
/// ASCII digits; otherwise every argument belongs to the message and the
/// last entry is edited.
pub fn split_target(args: &[String]) -> (Target, Option<String>) {
    match args.split_first() {
        Some((first, rest)) => match EntryIndex::parse(first) {
            Some(index) => (Target::ByIndex(index), join_message(rest)),
            None => (Target::ByLastEntry, join_message(args)),
        },
        None => (Target::ByLastEntry, None),
    }
}

pub fn check_in_command(args: &[String]) -> Command {
    let (offset, message) = split_offset(args);
    Command::CheckIn { offset, message }
}

pub fn check_out_command(args: &[String]) -> Command {
    let (offset, message) = split_offset(args);
    Command::CheckOut { offset, message }
}

pub fn edit_command(args: &[String]) -> Command {
    let (target, message) = split_target(args);
    Command::Edit { target, message }
}

/// Formats a duration as `1d 2h 5m`, dropping leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let (days, hours, minutes) = (minutes / 1440, (minutes / 60) % 24, minutes % 60);
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
