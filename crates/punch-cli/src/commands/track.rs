//! Check-in, check-out, edit and delete.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use punch_core::{Command, Outcome, Tracker};
use punch_store::JsonStore;

/// Applies one tracking command to the store and prints the outcome.
///
/// The store stays locked from load to save.
pub fn run<W: Write>(
    writer: &mut W,
    store: JsonStore,
    command: Command,
    now: DateTime<Utc>,
) -> Result<Outcome> {
    let _lock = store.lock().context("failed to lock timesheet")?;
    let path = store.path().to_path_buf();
    let tracker = Tracker::new(store);

    let outcome = tracker
        .run(command, now)
        .with_context(|| format!("failed to update {}", path.display()))?;

    writeln!(writer, "{outcome}")?;
    Ok(outcome)
}
