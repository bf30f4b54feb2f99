//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use punch_core::EntryIndex;

/// Check-in/check-out time tracker.
///
/// Start an entry with `t in`, stop it with `t out`. Both take an optional
/// offset such as `20m` (20 minutes ago) or `+1h` (an hour from now),
/// followed by an optional message.
#[derive(Debug, Parser)]
#[command(name = "t", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start tracking a new entry.
    #[command(name = "in", visible_aliases = ["i", "s", "start", "check-in"])]
    CheckIn {
        /// Optional offset (e.g. 2d3h25m, +1h) followed by a message.
        args: Vec<String>,
    },

    /// Stop tracking the running entry.
    #[command(name = "out", visible_aliases = ["o", "check-out"])]
    CheckOut {
        /// Optional offset (e.g. 20m, +1h40m) followed by a message that replaces the current one.
        args: Vec<String>,
    },

    /// Change the message of an entry (the last one unless an index is given).
    #[command(visible_alias = "e")]
    Edit {
        /// Optional zero-based entry index followed by the new message.
        args: Vec<String>,
    },

    /// Remove an entry.
    #[command(visible_alias = "d")]
    Delete {
        /// Zero-based entry index.
        index: EntryIndex,
    },

    /// Show whether time tracking is running.
    Status,
}
