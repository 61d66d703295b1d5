//! Profile commands for creating and inspecting student profiles.

use std::io::Write;

use anyhow::{Result, bail};

use crate::Config;

pub fn create<W: Write>(
    writer: &mut W,
    config: &Config,
    username: &str,
    full_name: &str,
) -> Result<()> {
    let db = super::open_database(config)?;
    db.create_student(username, full_name)?;
    writeln!(writer, "Created profile for {username} ({full_name})")?;
    Ok(())
}

pub fn show<W: Write>(writer: &mut W, config: &Config, username: &str) -> Result<()> {
    let db = super::open_database(config)?;
    let Some(student) = db.fetch_student(username)? else {
        bail!("no student with username {username:?}");
    };

    writeln!(writer, "{} ({})", student.username, student.full_name)?;

    let courses = db.list_enrollments(username)?;
    if courses.is_empty() {
        writeln!(writer, "Courses: none")?;
    } else {
        writeln!(writer, "Courses: {}", courses.join(", "))?;
    }

    let windows = db.list_availability(username)?;
    if windows.is_empty() {
        writeln!(writer, "Availability: none")?;
    } else {
        writeln!(writer, "Availability:")?;
        for window in windows {
            writeln!(
                writer,
                "  {} {}-{}",
                window.day, window.start_time, window.end_time
            )?;
        }
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
        (temp, config)
    }

    #[test]
    fn create_prints_confirmation() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();

        create(&mut output, &config, "alice", "Alice Smith").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Created profile for alice (Alice Smith)");
    }

    #[test]
    fn create_rejects_duplicate_username() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();
        create(&mut output, &config, "alice", "Alice A").unwrap();

        let err = create(&mut output, &config, "alice", "Alice B").unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[test]
    fn show_lists_courses_and_availability() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();
        create(&mut output, &config, "alice", "Alice Smith").unwrap();

        let db = crate::commands::open_database(&config).unwrap();
        db.add_enrollment("alice", "MATH 101").unwrap();
        db.add_enrollment("alice", "CS 200").unwrap();
        db.add_availability("alice", "Mon", "10:00", "12:00").unwrap();
        db.add_availability("alice", "Fri", "2:00 pm", "4:00 pm").unwrap();
        drop(db);

        let mut output = Vec::new();
        show(&mut output, &config, "alice").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        alice (Alice Smith)
        Courses: CS 200, MATH 101
        Availability:
          Mon 10:00-12:00
          Fri 14:00-16:00
        ");
    }

    #[test]
    fn show_handles_bare_profile() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();
        create(&mut output, &config, "bob", "Bob Jones").unwrap();

        let mut output = Vec::new();
        show(&mut output, &config, "bob").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        bob (Bob Jones)
        Courses: none
        Availability: none
        ");
    }

    #[test]
    fn show_rejects_unknown_student() {
        let (_temp, config) = test_config();
        let mut output = Vec::new();

        let err = show(&mut output, &config, "ghost").unwrap_err();
        assert!(err.to_string().contains("no student"));
    }
}
