//! Sessions command: list a student's sessions.

use std::io::Write;

use anyhow::Result;

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    username: &str,
    proposed_only: bool,
    json: bool,
) -> Result<()> {
    let db = super::open_database(config)?;
    let sessions = if proposed_only {
        db.list_proposed_for_invitee(username)?
    } else {
        db.list_sessions_for(username)?
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&sessions)?)?;
        return Ok(());
    }

    if sessions.is_empty() {
        writeln!(writer, "No sessions.")?;
        return Ok(());
    }
    for session in &sessions {
        writeln!(
            writer,
            "#{}  {}  {} {}-{}  {}  {} -> {}",
            session.id,
            session.course_code,
            session.day,
            session.start_time,
            session.end_time,
            session.status,
            session.initiator,
            session.invitee
        )?;
    }
    Ok(())
}
