//! Status command for showing whether tracking is running.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};

use punch_core::{EntryStore, Timesheet};
use punch_store::JsonStore;

use crate::commands::util::format_duration;

pub fn run<W: Write>(writer: &mut W, store: &JsonStore, now: DateTime<Utc>) -> Result<()> {
    let timesheet = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    write_status(writer, &timesheet, now, &chrono::Local)
}

/// Renders the status of `timesheet`, showing times in `tz`.
pub fn write_status<W, Tz>(
    writer: &mut W,
    timesheet: &Timesheet,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match timesheet.running() {
        Some(entry) => {
            let since = entry
                .start
                .map(|start| start.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let elapsed = entry.duration(now).map(format_duration).unwrap_or_default();
            writeln!(writer, "Time tracking running since {since} ({elapsed})")?;
            if let Some(message) = &entry.message {
                writeln!(writer, "Message: {message}")?;
            }
        }
        None => writeln!(writer, "Time tracking not running.")?,
    }
    writeln!(writer, "Entries: {}", timesheet.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use insta::assert_snapshot;
    use punch_core::Entry;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn render(timesheet: &Timesheet) -> String {
        let mut output = Vec::new();
        write_status(&mut output, timesheet, now(), &Utc).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn status_when_idle() {
        assert_snapshot!(render(&Timesheet::new()), @r"
        Time tracking not running.
        Entries: 0
        ");
    }

    #[test]
    fn status_when_running() {
        let sheet = Timesheet::from(vec![
            Entry {
                start: Some(now() - Duration::hours(3)),
                end: Some(now() - Duration::hours(2)),
                message: None,
            },
            Entry::started_at(
                now() - Duration::minutes(95),
                Some("writing docs".to_string()),
            ),
        ]);

        assert_snapshot!(render(&sheet), @r"
        Time tracking running since 2025-01-01 10:25 (1h 35m)
        Message: writing docs
        Entries: 2
        ");
    }

    #[test]
    fn status_reads_from_store() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp.path().join("times.json"));
        let mut output = Vec::new();

        run(&mut output, &store, now()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Time tracking not running."));
    }
}
