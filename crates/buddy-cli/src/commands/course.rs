//! Course enrollment commands.

use std::io::Write;

use anyhow::Result;

use crate::Config;

pub fn add<W: Write>(writer: &mut W, config: &Config, username: &str, course: &str) -> Result<()> {
    let db = super::open_database(config)?;
    let course = course.trim();
    db.add_enrollment(username, course)?;
    writeln!(writer, "Enrolled {username} in {course}")?;
    Ok(())
}

pub fn remove<W: Write>(
    writer: &mut W,
    config: &Config,
    username: &str,
    course: &str,
) -> Result<()> {
    let db = super::open_database(config)?;
    let course = course.trim();
    db.remove_enrollment(username, course)?;
    writeln!(writer, "Dropped {course} for {username}")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, config: &Config, username: &str) -> Result<()> {
    let db = super::open_database(config)?;
    let courses = db.list_enrollments(username)?;
    if courses.is_empty() {
        writeln!(writer, "No courses.")?;
        return Ok(());
    }
    for course in courses {
        writeln!(writer, "{course}")?;
    }
    Ok(())
}
