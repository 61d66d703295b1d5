//! End-to-end integration tests for the full matching flow.
//!
//! Drives the `buddy` binary through profile setup, matching, and the
//! propose/confirm workflow against one shared database file.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn buddy_binary() -> String {
    env!("CARGO_BIN_EXE_buddy").to_string()
}

/// Write a config pointing at a database inside the temp directory.
fn write_config(temp: &Path) -> PathBuf {
    let db_file = temp.join("buddy.db");
    let config_file = temp.join("config.toml");
    std::fs::write(
        &config_file,
        format!(r#"database_path = "{}""#, db_file.display()),
    )
    .unwrap();
    config_file
}

fn buddy(config: &Path, args: &[&str]) -> Output {
    Command::new(buddy_binary())
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run buddy")
}

fn buddy_ok(config: &Path, args: &[&str]) -> String {
    let output = buddy(config, args);
    assert!(
        output.status.success(),
        "buddy {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_full_matching_flow() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    buddy_ok(&config, &["profile", "create", "alice", "Alice Smith"]);
    buddy_ok(&config, &["profile", "create", "bob", "Bob Jones"]);
    buddy_ok(&config, &["course", "add", "alice", "CS 200"]);
    buddy_ok(&config, &["course", "add", "bob", "CS 200"]);
    buddy_ok(&config, &["avail", "add", "alice", "Mon", "10:00", "12:00"]);
    buddy_ok(&config, &["avail", "add", "bob", "monday", "11:00 am", "1:00 pm"]);

    // The overlap is Mon 11:00-12:00
    let suggestions = buddy_ok(&config, &["suggest", "alice"]);
    assert!(
        suggestions.contains("bob (Bob Jones)") && suggestions.contains("Mon 11:00-12:00"),
        "unexpected suggestions: {suggestions}"
    );

    let proposed = buddy_ok(
        &config,
        &["propose", "alice", "bob", "CS 200", "Mon", "11:00", "11:45"],
    );
    assert!(proposed.contains("Proposed session #1"));

    // bob sees the incoming proposal
    let incoming = buddy_ok(&config, &["sessions", "bob", "--proposed"]);
    assert!(incoming.contains("#1") && incoming.contains("Proposed"));

    buddy_ok(&config, &["confirm", "1", "bob"]);

    let sessions = buddy_ok(&config, &["sessions", "alice"]);
    assert!(sessions.contains("Confirmed"), "session should be confirmed: {sessions}");
}

#[test]
fn test_suggest_json_is_machine_readable() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    buddy_ok(&config, &["profile", "create", "alice", "Alice Smith"]);
    buddy_ok(&config, &["profile", "create", "bob", "Bob Jones"]);
    buddy_ok(&config, &["course", "add", "alice", "CS 200"]);
    buddy_ok(&config, &["course", "add", "bob", "CS 200"]);
    buddy_ok(&config, &["avail", "add", "alice", "Mon", "10:00", "12:00"]);
    buddy_ok(&config, &["avail", "add", "bob", "Mon", "11:00", "13:00"]);

    let stdout = buddy_ok(&config, &["suggest", "alice", "--json"]);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("suggest --json should emit valid JSON");

    let suggestions = parsed.as_array().expect("top level should be an array");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["username"].as_str(), Some("bob"));
    assert_eq!(suggestions[0]["overlap_day"].as_str(), Some("Mon"));
    assert_eq!(suggestions[0]["overlap_start"].as_str(), Some("11:00"));
}

#[test]
fn test_initiator_cannot_confirm() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    buddy_ok(&config, &["profile", "create", "alice", "Alice Smith"]);
    buddy_ok(&config, &["profile", "create", "bob", "Bob Jones"]);
    buddy_ok(&config, &["course", "add", "alice", "CS 200"]);
    buddy_ok(&config, &["course", "add", "bob", "CS 200"]);
    buddy_ok(&config, &["avail", "add", "alice", "Mon", "10:00", "12:00"]);
    buddy_ok(&config, &["avail", "add", "bob", "Mon", "10:00", "12:00"]);
    buddy_ok(
        &config,
        &["propose", "alice", "bob", "CS 200", "Mon", "10:00", "11:00"],
    );

    let output = buddy(&config, &["confirm", "1", "alice"]);
    assert!(!output.status.success(), "initiator confirm should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("only the invitee"),
        "should name the authorization failure: {stderr}"
    );

    // Still confirmable by the right person afterwards
    buddy_ok(&config, &["confirm", "1", "bob"]);
}

#[test]
fn test_validation_errors_surface_on_stderr() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    buddy_ok(&config, &["profile", "create", "alice", "Alice Smith"]);

    let output = buddy(&config, &["avail", "add", "alice", "Mon", "17:30 pm", "18:30"]);
    assert!(!output.status.success(), "mixed-notation time should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("17:30 pm"), "should echo the bad input: {stderr}");
}
