//! Propose command: offer a study session to a classmate.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Config;

#[expect(
    clippy::too_many_arguments,
    reason = "mirrors the positional CLI arguments one to one"
)]
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    initiator: &str,
    invitee: &str,
    course: &str,
    day: &str,
    start: &str,
    end: &str,
) -> Result<()> {
    let mut db = super::open_database(config)?;
    let id = db.propose_session(initiator, invitee, course, day, start, end)?;
    let session = db
        .fetch_session(id)?
        .context("session vanished after insert")?;
    writeln!(
        writer,
        "Proposed session #{id}: {} with {} on {} {}-{}",
        session.course_code, session.invitee, session.day, session.start_time, session.end_time
    )?;
    Ok(())
}
