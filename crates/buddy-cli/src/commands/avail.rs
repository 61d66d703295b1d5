//! Availability window commands.

use std::io::Write;

use anyhow::Result;
use buddy_core::{format_minutes, validate_slot};

use crate::Config;

pub fn add<W: Write>(
    writer: &mut W,
    config: &Config,
    username: &str,
    day: &str,
    start: &str,
    end: &str,
) -> Result<()> {
    let db = super::open_database(config)?;
    let id = db.add_availability(username, day, start, end)?;
    // The insert validated these inputs; reparse only to echo the stored form
    let slot = validate_slot(day, start, end)?;
    writeln!(
        writer,
        "Added window #{id}: {} {}-{}",
        slot.day,
        format_minutes(slot.start),
        format_minutes(slot.end)
    )?;
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, config: &Config, id: i64) -> Result<()> {
    let db = super::open_database(config)?;
    db.remove_availability(id)?;
    writeln!(writer, "Removed window #{id}")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, config: &Config, username: &str) -> Result<()> {
    let db = super::open_database(config)?;
    let windows = db.list_availability(username)?;
    if windows.is_empty() {
        writeln!(writer, "No availability windows.")?;
        return Ok(());
    }
    for window in windows {
        writeln!(
            writer,
            "#{}  {} {}-{}",
            window.id, window.day, window.start_time, window.end_time
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn test_config() -> (tempfile::TempDir, Config) {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: temp.path().join("buddy.db"),
        };
        let db = crate::commands::open_database(&config).unwrap();
        db.create_student("alice", "Alice Smith").unwrap();
        (temp, config)
    }

    #[test]
    fn add_echoes_normalized_window() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();

        add(&mut output, &config, "alice", "tuesday", "2:00 pm", "4:30 pm").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Added window #1: Tue 14:00-16:30");
    }

    #[test]
    fn add_rejects_bad_day() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();

        let err = add(&mut output, &config, "alice", "Funday", "10:00", "12:00").unwrap_err();
        assert!(err.to_string().contains("day must be one of"));
        assert!(output.is_empty());
    }

    #[test]
    fn list_orders_by_day_then_start() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();
        add(&mut output, &config, "alice", "Fri", "09:00", "10:00").unwrap();
        add(&mut output, &config, "alice", "Mon", "15:00", "17:00").unwrap();
        add(&mut output, &config, "alice", "Mon", "08:00", "09:00").unwrap();

        let mut output = Vec::new();
        list(&mut output, &config, "alice").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        #3  Mon 08:00-09:00
        #2  Mon 15:00-17:00
        #1  Fri 09:00-10:00
        ");
    }

    #[test]
    fn remove_then_list_empty() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();
        add(&mut output, &config, "alice", "Mon", "10:00", "12:00").unwrap();

        let mut output = Vec::new();
        remove(&mut output, &config, 1).unwrap();
        list(&mut output, &config, "alice").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Removed window #1
        No availability windows.
        ");
    }
}
