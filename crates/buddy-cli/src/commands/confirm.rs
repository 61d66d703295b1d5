//! Confirm command: accept a proposed session as its invitee.

use std::io::Write;

use anyhow::Result;

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    session_id: i64,
    username: &str,
) -> Result<()> {
    let mut db = super::open_database(config)?;
    db.confirm_session(session_id, username)?;
    writeln!(writer, "Confirmed session #{session_id}")?;
    Ok(())
}
