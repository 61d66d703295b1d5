//! Suggest command: study partner suggestions with an example overlap slot.

use std::io::Write;

use anyhow::Result;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, username: &str, json: bool) -> Result<()> {
    let db = super::open_database(config)?;
    let suggestions = db.suggest_matches(username)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&suggestions)?)?;
        return Ok(());
    }

    if suggestions.is_empty() {
        writeln!(writer, "No study buddies found.")?;
        writeln!(
            writer,
            "Hint: add shared courses and availability windows first."
        )?;
        return Ok(());
    }

    for suggestion in &suggestions {
        writeln!(
            writer,
            "{} ({})  shares {}  free {} {}-{}",
            suggestion.username,
            suggestion.full_name,
            suggestion.shared_courses.join(", "),
            suggestion.overlap_day,
            suggestion.overlap_start,
            suggestion.overlap_end
        )?;
    }
    Ok(())
}
