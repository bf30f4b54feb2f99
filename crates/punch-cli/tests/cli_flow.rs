//! End-to-end tests driving the `t` binary.
//!
//! Every invocation is a fresh process that reads and rewrites the data file
//! named in a temporary JSON config.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

const START_SUCCESSFUL: &str = "Checked in";
const DOUBLE_START: &str = "Time tracking already running!";
const STOP_SUCCESSFUL: &str = "Checked out";
const NOT_RUNNING: &str = "Time tracking not running!";
const EDIT_SUCCESSFUL: &str = "Entry changed";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

fn t_binary() -> String {
    env!("CARGO_BIN_EXE_t").to_string()
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

struct Sandbox {
    temp: TempDir,
    config: PathBuf,
    data_file: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let data_file = temp.path().join("times.json");
        let config = temp.path().join("config.json");
        let json = serde_json::json!({ "data_file": data_file });
        std::fs::write(&config, json.to_string()).unwrap();
        Self {
            temp,
            config,
            data_file,
        }
    }

    /// Runs `t --config <config> args...` and returns trimmed stdout.
    fn t(&self, args: &[&str]) -> String {
        let output = Command::new(t_binary())
            .env("HOME", self.temp.path())
            .env("XDG_CONFIG_HOME", self.temp.path().join("xdg"))
            .env_remove("PUNCH_DATA_FILE")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .output()
            .expect("failed to run t");
        assert!(
            output.status.success(),
            "t {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap().trim_end().to_string()
    }

    fn entries(&self) -> Vec<Value> {
        read_entries(&self.data_file)
    }

    fn last(&self) -> Value {
        self.entries().last().cloned().expect("no entries")
    }
}

fn read_entries(path: &Path) -> Vec<Value> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap(),
        Err(_) => Vec::new(),
    }
}

fn assert_near(actual: &Value, expected: i64) {
    let actual = actual.as_i64().unwrap_or_else(|| panic!("not a timestamp: {actual}"));
    assert!(
        (actual - expected).abs() <= 2,
        "expected {actual} to be within 2s of {expected}"
    );
}

fn is_running(entry: &Value) -> bool {
    entry["start"].as_i64().is_some_and(|s| s > 0) && entry.get("end").is_none()
}

#[test]
fn check_in_works() {
    let sb = Sandbox::new();
    assert!(sb.entries().is_empty());

    assert!(sb.t(&["in"]).contains(START_SUCCESSFUL));

    let last = sb.last();
    assert!(is_running(&last));
    assert_near(&last["start"], now());
}

#[test]
fn check_in_aliases() {
    for alias in ["i", "s", "start"] {
        let sb = Sandbox::new();
        assert!(sb.t(&[alias]).contains(START_SUCCESSFUL));
        assert!(is_running(&sb.last()));
    }
}

#[test]
fn check_in_warns_when_already_started() {
    let sb = Sandbox::new();
    sb.t(&["i"]);
    let before = sb.entries();

    assert!(sb.t(&["i"]).contains(DOUBLE_START));
    assert_eq!(sb.entries(), before);
}

#[test]
fn check_in_sets_message() {
    let sb = Sandbox::new();
    sb.t(&["i", "a cool message"]);

    let last = sb.last();
    assert!(is_running(&last));
    assert_eq!(last["message"], "a cool message");
}

#[test]
fn check_in_non_ascii_digits_are_a_message() {
    let sb = Sandbox::new();
    sb.t(&["i", "\u{663}h"]);

    let last = sb.last();
    assert_near(&last["start"], now());
    assert_eq!(last["message"], "\u{663}h");
}

#[test]
fn check_in_sets_time_from_offset() {
    let sb = Sandbox::new();
    sb.t(&["i", "2d3h25m"]);

    assert_near(&sb.last()["start"], now() - (2 * DAY + 3 * HOUR + 25 * MINUTE));
}

#[test]
fn check_in_sets_future_time_with_message() {
    let sb = Sandbox::new();
    sb.t(&["i", "+1d3h10m", "what an entry"]);

    let last = sb.last();
    assert_near(&last["start"], now() + (DAY + 3 * HOUR + 10 * MINUTE));
    assert!(is_running(&last));
    assert_eq!(last["message"], "what an entry");
}

#[test]
fn check_out_works() {
    let sb = Sandbox::new();
    let start = now() - 20 * MINUTE;
    sb.t(&["i", "20m"]);

    assert!(sb.t(&["out"]).contains(STOP_SUCCESSFUL));

    let last = sb.last();
    assert!(!is_running(&last));
    assert_near(&last["start"], start);
    assert_near(&last["end"], now());
}

#[test]
fn check_out_alias_and_not_running_warning() {
    let sb = Sandbox::new();
    sb.t(&["i", "20m"]);

    assert!(sb.t(&["o"]).contains(STOP_SUCCESSFUL));
    let before = sb.entries();
    assert!(sb.t(&["o"]).contains(NOT_RUNNING));
    assert_eq!(sb.entries(), before);
}

#[test]
fn check_out_sets_time_from_offset() {
    let sb = Sandbox::new();
    sb.t(&["i", "20m"]);
    sb.t(&["i"]);

    sb.t(&["o", "+1h40m"]);

    assert_near(&sb.last()["end"], now() + HOUR + 40 * MINUTE);
}

#[test]
fn check_out_message_overwrites_check_in_message() {
    let sb = Sandbox::new();
    sb.t(&["i", "not the message"]);

    sb.t(&["o", "that is the message!"]);

    let last = sb.last();
    assert!(last["end"].as_i64().is_some_and(|e| e > 0));
    assert_eq!(last["message"], "that is the message!");
}

/// One closed entry and one running entry.
fn two_entries() -> (Sandbox, i64) {
    let sb = Sandbox::new();
    sb.t(&["i", "1h", "entry one"]);
    sb.t(&["o", "30m"]);
    let start_two = now() - 20 * MINUTE;
    sb.t(&["i", "20m", "entry two"]);
    (sb, start_two)
}

#[test]
fn edit_targets_last_entry_by_default() {
    let (sb, start_two) = two_entries();

    assert!(sb.t(&["e", "edited running entry two"]).contains(EDIT_SUCCESSFUL));
    let last = sb.last();
    assert!(is_running(&last));
    assert_eq!(last["message"], "edited running entry two");
    assert_near(&last["start"], start_two);

    let stop_two = now();
    sb.t(&["o"]);
    assert!(sb.t(&["e", "edited stopped entry two"]).contains(EDIT_SUCCESSFUL));
    let last = sb.last();
    assert_eq!(last["message"], "edited stopped entry two");
    assert_near(&last["start"], start_two);
    assert_near(&last["end"], stop_two);
    assert_eq!(sb.entries()[0]["message"], "entry one");
}

#[test]
fn edit_targets_given_index() {
    let (sb, _) = two_entries();
    sb.t(&["o"]);

    assert!(sb.t(&["e", "0", "edited stopped entry one"]).contains(EDIT_SUCCESSFUL));

    let entries = sb.entries();
    assert_eq!(entries[0]["message"], "edited stopped entry one");
    assert_eq!(entries[1]["message"], "entry two");
}

#[test]
fn edit_without_arguments_only_touches_last_message() {
    let (sb, _) = two_entries();
    let before = sb.entries();

    assert!(sb.t(&["e"]).contains(EDIT_SUCCESSFUL));

    let after = sb.entries();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1]["start"], before[1]["start"]);
    assert!(after[1].get("message").is_none());
}

#[test]
fn edit_missing_entry_fails() {
    let (sb, _) = two_entries();
    let before = sb.entries();

    assert_eq!(sb.t(&["e", "37", "OH NOES"]), "Entry 37 not found!");
    assert_eq!(sb.entries(), before);
}

#[test]
fn edit_oversized_index_is_not_found() {
    let (sb, _) = two_entries();
    let before = sb.entries();

    assert_eq!(
        sb.t(&["e", "99999999999999999999999", "OH NOES"]),
        "Entry 99999999999999999999999 not found!"
    );
    assert_eq!(sb.t(&["e", "007", "OH NOES"]), "Entry 007 not found!");
    assert_eq!(sb.entries(), before);
}

#[test]
fn delete_removes_entry() {
    let sb = Sandbox::new();
    sb.t(&["i", "1h", "entry one"]);
    sb.t(&["o", "30m"]);
    let start_two = now() - 20 * MINUTE;
    sb.t(&["i", "20m", "entry two"]);
    let stop_two = now();
    sb.t(&["o"]);

    sb.t(&["d", "0"]);

    let entries = sb.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["message"], "entry two");
    assert_near(&entries[0]["start"], start_two);
    assert_near(&entries[0]["end"], stop_two);
}

#[test]
fn delete_out_of_range_is_harmless() {
    let (sb, _) = two_entries();
    let before = sb.entries();

    assert_eq!(sb.t(&["d", "9"]), "Entry 9 not found!");
    assert_eq!(
        sb.t(&["d", "99999999999999999999"]),
        "Entry 99999999999999999999 not found!"
    );
    assert_eq!(sb.entries(), before);
}

#[test]
fn status_reports_running_entry() {
    let (sb, _) = two_entries();

    let output = sb.t(&["status"]);

    assert!(output.starts_with("Time tracking running since"));
    assert!(output.contains("Message: entry two"));
    assert!(output.ends_with("Entries: 2"));
}

#[test]
fn corrupt_data_file_is_fatal() {
    let sb = Sandbox::new();
    std::fs::write(&sb.data_file, "not json").unwrap();

    let output = Command::new(t_binary())
        .env("HOME", sb.temp.path())
        .env_remove("PUNCH_DATA_FILE")
        .arg("--config")
        .arg(&sb.config)
        .arg("i")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(std::fs::read_to_string(&sb.data_file).unwrap(), "not json");
}
