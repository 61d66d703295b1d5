//! Classmates command: who else is enrolled in a course.

use std::io::Write;

use anyhow::Result;

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    username: &str,
    course: &str,
) -> Result<()> {
    let db = super::open_database(config)?;
    let course = course.trim();
    let classmates = db.find_classmates_by_course(username, course)?;
    if classmates.is_empty() {
        writeln!(writer, "No classmates found in {course}.")?;
        return Ok(());
    }
    for student in classmates {
        writeln!(writer, "{} ({})", student.username, student.full_name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn lists_other_enrollees_by_username() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: temp.path().join("buddy.db"),
        };
        let db = crate::commands::open_database(&config).unwrap();
        for (username, full_name) in [
            ("zoe", "Zoe Gray"),
            ("alice", "Alice Smith"),
            ("bob", "Bob Jones"),
        ] {
            db.create_student(username, full_name).unwrap();
            db.add_enrollment(username, "ENG 101").unwrap();
        }
        drop(db);

        let mut output = Vec::new();
        run(&mut output, &config, "alice", "ENG 101").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        bob (Bob Jones)
        zoe (Zoe Gray)
        ");
    }

    #[test]
    fn empty_course_prints_notice() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: temp.path().join("buddy.db"),
        };
        let db = crate::commands::open_database(&config).unwrap();
        db.create_student("alice", "Alice Smith").unwrap();
        drop(db);

        let mut output = Vec::new();
        run(&mut output, &config, "alice", "ENG 101").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"No classmates found in ENG 101.");
    }
}
