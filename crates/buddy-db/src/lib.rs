//! Record store for the study buddy matcher.
//!
//! Provides persistence for students, enrollments, availability windows, and
//! sessions using `rusqlite`, plus the transactional workflow operations
//! (`suggest_matches`, `propose_session`, `confirm_session`) built on top of
//! the pure logic in `buddy-core`.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. For shared use, serialize access with a `Mutex` or give each
//! thread its own connection.
//!
//! # Schema
//!
//! Day codes are stored as canonical `'Mon'..'Sun'` strings and times as
//! zero-padded 24-hour `"HH:MM"` text; both are parsed back through
//! `buddy-core` when rows are loaded. Uniqueness (usernames, enrollment
//! pairs, exact availability tuples) and referential integrity live in the
//! schema; constraint violations are translated into [`Rejection`]s at this
//! boundary rather than leaking `rusqlite` errors upward.
//!
//! Workflow operations run their read-validate-write sequence inside one
//! transaction so that two racing `confirm_session` calls cannot both land
//! overlapping slots on the same invitee.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use thiserror::Error;

use buddy_core::{AvailabilityIndex, Candidate, Day, Rejection, SessionStatus, Slot};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A structured refusal of the requested operation.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// A stored row no longer parses (day, time, or status text).
    #[error("invalid {table} record {id}: {message}")]
    InvalidRecord {
        table: &'static str,
        id: i64,
        message: String,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A student profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub username: String,
    pub full_name: String,
}

/// One availability window as stored, with its row id for removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityRow {
    pub id: i64,
    pub day: Day,
    pub start_time: String,
    pub end_time: String,
}

/// A study session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub id: i64,
    pub course_code: String,
    pub initiator: String,
    pub invitee: String,
    pub day: Day,
    pub start_time: String,
    pub end_time: String,
    pub status: SessionStatus,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS student (
                username TEXT PRIMARY KEY,
                full_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS enrollment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                course_code TEXT NOT NULL,
                UNIQUE(username, course_code),
                FOREIGN KEY (username) REFERENCES student(username) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS availability (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                day_of_week TEXT NOT NULL CHECK(day_of_week IN ('Mon','Tue','Wed','Thu','Fri','Sat','Sun')),
                start_time TEXT NOT NULL,
                end_time   TEXT NOT NULL,
                UNIQUE(username, day_of_week, start_time, end_time),
                FOREIGN KEY (username) REFERENCES student(username) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                course_code TEXT NOT NULL,
                initiator_username TEXT NOT NULL,
                invitee_username   TEXT NOT NULL,
                day_of_week TEXT NOT NULL CHECK(day_of_week IN ('Mon','Tue','Wed','Thu','Fri','Sat','Sun')),
                start_time TEXT NOT NULL,
                end_time   TEXT NOT NULL,
                status TEXT NOT NULL CHECK(status IN ('Proposed','Confirmed')),
                FOREIGN KEY (initiator_username) REFERENCES student(username),
                FOREIGN KEY (invitee_username)   REFERENCES student(username)
            );

            CREATE INDEX IF NOT EXISTS idx_enrollment_course ON enrollment(course_code);
            CREATE INDEX IF NOT EXISTS idx_avail_user ON availability(username);
            CREATE INDEX IF NOT EXISTS idx_session_invitee ON session(invitee_username, status);
            ",
        )?;
        Ok(())
    }

    // ---------- Students ----------

    /// Creates a student profile. Usernames are unique; both fields are
    /// required.
    pub fn create_student(&self, username: &str, full_name: &str) -> Result<(), DbError> {
        if username.trim().is_empty() {
            return Err(Rejection::Empty { field: "username" }.into());
        }
        if full_name.trim().is_empty() {
            return Err(Rejection::Empty { field: "full name" }.into());
        }
        self.conn
            .execute(
                "INSERT INTO student(username, full_name) VALUES(?, ?)",
                params![username, full_name],
            )
            .map_err(|err| match constraint_kind(&err) {
                Some(ConstraintKind::Unique) => Rejection::DuplicateUsername {
                    username: username.to_string(),
                }
                .into(),
                _ => DbError::Sqlite(err),
            })?;
        tracing::debug!(username, "student created");
        Ok(())
    }

    /// Fetches a student by username.
    pub fn fetch_student(&self, username: &str) -> Result<Option<Student>, DbError> {
        fetch_student_row(&self.conn, username)
    }

    // ---------- Enrollments ----------

    /// Enrolls a student in a course. Duplicate pairs are rejected.
    pub fn add_enrollment(&self, username: &str, course_code: &str) -> Result<(), DbError> {
        let course_code = course_code.trim();
        if course_code.is_empty() {
            return Err(Rejection::Empty {
                field: "course code",
            }
            .into());
        }
        self.conn
            .execute(
                "INSERT INTO enrollment(username, course_code) VALUES(?, ?)",
                params![username, course_code],
            )
            .map_err(|err| match constraint_kind(&err) {
                Some(ConstraintKind::Unique) => Rejection::DuplicateEnrollment {
                    username: username.to_string(),
                    course: course_code.to_string(),
                }
                .into(),
                Some(ConstraintKind::ForeignKey) => Rejection::UnknownStudent {
                    username: username.to_string(),
                }
                .into(),
                None => DbError::Sqlite(err),
            })?;
        Ok(())
    }

    /// Removes an enrollment. No-op when the pair does not exist.
    pub fn remove_enrollment(&self, username: &str, course_code: &str) -> Result<(), DbError> {
        self.conn.execute(
            "DELETE FROM enrollment WHERE username = ? AND course_code = ?",
            params![username, course_code.trim()],
        )?;
        Ok(())
    }

    /// Lists a student's course codes, ascending.
    pub fn list_enrollments(&self, username: &str) -> Result<Vec<String>, DbError> {
        enrollments(&self.conn, username)
    }

    // ---------- Availability ----------

    /// Adds an availability window after normalizing the day and times.
    ///
    /// Times are stored in canonical 24-hour form, so `"5:30 pm"` and
    /// `"17:30"` count as the same tuple for uniqueness. Returns the new
    /// row's id.
    pub fn add_availability(
        &self,
        username: &str,
        day_raw: &str,
        start_raw: &str,
        end_raw: &str,
    ) -> Result<i64, DbError> {
        let slot = buddy_core::validate_slot(day_raw, start_raw, end_raw)?;
        self.conn
            .execute(
                "INSERT INTO availability(username, day_of_week, start_time, end_time) VALUES(?,?,?,?)",
                params![
                    username,
                    slot.day.as_str(),
                    buddy_core::format_minutes(slot.start),
                    buddy_core::format_minutes(slot.end),
                ],
            )
            .map_err(|err| match constraint_kind(&err) {
                Some(ConstraintKind::Unique) => Rejection::DuplicateAvailability.into(),
                Some(ConstraintKind::ForeignKey) => Rejection::UnknownStudent {
                    username: username.to_string(),
                }
                .into(),
                None => DbError::Sqlite(err),
            })?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Removes an availability window by id. No-op when absent.
    pub fn remove_availability(&self, id: i64) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM availability WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Lists a student's availability ordered by day (Mon=1..Sun=7), then
    /// start time.
    pub fn list_availability(&self, username: &str) -> Result<Vec<AvailabilityRow>, DbError> {
        availability_rows(&self.conn, username)
    }

    // ---------- Matching ----------

    /// All other students enrolled in `course_code`, ordered by username.
    pub fn find_classmates_by_course(
        &self,
        username: &str,
        course_code: &str,
    ) -> Result<Vec<Student>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT s.username, s.full_name
            FROM enrollment e
            JOIN student s ON s.username = e.username
            WHERE e.course_code = ? AND s.username <> ?
            ORDER BY s.username
            ",
        )?;
        let rows = stmt.query_map(params![course_code.trim(), username], |row| {
            Ok(Student {
                username: row.get(0)?,
                full_name: row.get(1)?,
            })
        })?;
        let mut students = Vec::new();
        for row in rows {
            students.push(row?);
        }
        Ok(students)
    }

    /// Suggests classmates who share a course and have a qualifying (>= 30
    /// minute) availability overlap with the user.
    ///
    /// Candidates are surfaced in discovery order; a candidate with no
    /// overlap anywhere in the week is dropped entirely. If the user has no
    /// enrollments, no candidate query is issued.
    pub fn suggest_matches(&self, username: &str) -> Result<Vec<buddy_core::Suggestion>, DbError> {
        let my_courses = enrollments(&self.conn, username)?;
        if my_courses.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; my_courses.len()].join(", ");
        let query = format!(
            "
            SELECT DISTINCT s.username, s.full_name, e.course_code
            FROM enrollment e
            JOIN student s ON s.username = e.username
            WHERE e.course_code IN ({placeholders})
              AND s.username <> ?
            ORDER BY s.username, e.course_code
            "
        );
        let mut stmt = self.conn.prepare(&query)?;
        let mut bindings: Vec<&str> = my_courses.iter().map(String::as_str).collect();
        bindings.push(username);
        let rows = stmt.query_map(rusqlite::params_from_iter(bindings), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        // Group shared courses per classmate, preserving first-seen order.
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for row in rows {
            let (candidate_username, full_name, course) = row?;
            match seen.get(&candidate_username) {
                Some(&slot) => candidates[slot].shared_courses.push(course),
                None => {
                    seen.insert(candidate_username.clone(), candidates.len());
                    candidates.push(Candidate {
                        username: candidate_username,
                        full_name,
                        shared_courses: vec![course],
                    });
                }
            }
        }

        let mine = availability_index(&self.conn, username)?;
        let mut suggestions = Vec::new();
        for candidate in candidates {
            let theirs = availability_index(&self.conn, &candidate.username)?;
            if let Some(suggestion) = buddy_core::screen_candidate(candidate, &mine, &theirs) {
                suggestions.push(suggestion);
            }
        }
        tracing::debug!(username, count = suggestions.len(), "computed suggestions");
        Ok(suggestions)
    }

    // ---------- Sessions ----------

    /// Proposes a study session from `initiator` to `invitee`.
    ///
    /// Validation is fail-fast in the documented order: both students exist,
    /// both are enrolled in the course, the day and times are well-formed
    /// with start < end, the duration is at least 30 minutes, and the slot
    /// lies fully inside a single qualifying overlap of the two users'
    /// availability. Runs inside one transaction; nothing is written on
    /// failure. Returns the new session id.
    pub fn propose_session(
        &mut self,
        initiator: &str,
        invitee: &str,
        course_code: &str,
        day_raw: &str,
        start_raw: &str,
        end_raw: &str,
    ) -> Result<i64, DbError> {
        let course_code = course_code.trim();
        let tx = self.conn.transaction()?;

        for username in [initiator, invitee] {
            if fetch_student_row(&tx, username)?.is_none() {
                return Err(Rejection::UnknownStudent {
                    username: username.to_string(),
                }
                .into());
            }
        }
        for username in [initiator, invitee] {
            if !enrollments(&tx, username)?.iter().any(|c| c == course_code) {
                return Err(Rejection::NotEnrolled {
                    username: username.to_string(),
                    course: course_code.to_string(),
                }
                .into());
            }
        }

        let slot = buddy_core::validate_slot(day_raw, start_raw, end_raw)?;
        buddy_core::validate_duration(&slot)?;

        let mine = availability_index(&tx, initiator)?;
        let theirs = availability_index(&tx, invitee)?;
        if !buddy_core::slot_within_qualifying_overlap(&mine, &theirs, slot.day, slot.start, slot.end)
        {
            return Err(Rejection::OutsideOverlap.into());
        }

        tx.execute(
            "
            INSERT INTO session(course_code, initiator_username, invitee_username,
                                day_of_week, start_time, end_time, status)
            VALUES(?,?,?,?,?,?, 'Proposed')
            ",
            params![
                course_code,
                initiator,
                invitee,
                slot.day.as_str(),
                buddy_core::format_minutes(slot.start),
                buddy_core::format_minutes(slot.end),
            ],
        )?;
        let session_id = tx.last_insert_rowid();
        tx.commit()?;
        tracing::info!(session_id, initiator, invitee, "session proposed");
        Ok(session_id)
    }

    /// Fetches a session by id.
    pub fn fetch_session(&self, id: i64) -> Result<Option<SessionRecord>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "{SESSION_SELECT} WHERE id = ?"
        ))?;
        let row = stmt
            .query_row(params![id], session_row_fields)
            .optional()?;
        row.map(parse_session_row).transpose()
    }

    /// Confirms a proposed session on behalf of `invitee`.
    ///
    /// Only the addressed invitee may confirm. Confirming an
    /// already-confirmed session is an idempotent no-op. The slot may not
    /// time-overlap any of the invitee's other confirmed sessions on the
    /// same day by even a minute; back-to-back sessions are allowed.
    /// Runs inside one transaction.
    pub fn confirm_session(&mut self, session_id: i64, invitee: &str) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;

        let session = {
            let mut stmt = tx.prepare(&format!("{SESSION_SELECT} WHERE id = ?"))?;
            stmt.query_row(params![session_id], session_row_fields)
                .optional()?
                .map(parse_session_row)
                .transpose()?
                .ok_or(Rejection::UnknownSession { id: session_id })?
        };

        if session.invitee != invitee {
            return Err(Rejection::NotInvitee.into());
        }
        if session.status == SessionStatus::Confirmed {
            tracing::debug!(session_id, "session already confirmed");
            return Ok(());
        }

        let slot = session_slot(&session)?;
        // Only the invitee's calendar is checked; the initiator may end up
        // double-booked across invitees. Inherited behavior, kept on purpose.
        let confirmed = confirmed_slots(&tx, invitee)?;
        if buddy_core::conflicts_with_confirmed(&slot, confirmed) {
            return Err(Rejection::ConfirmedSessionOverlap.into());
        }

        tx.execute(
            "UPDATE session SET status = 'Confirmed' WHERE id = ?",
            params![session_id],
        )?;
        tx.commit()?;
        tracing::info!(session_id, invitee, "session confirmed");
        Ok(())
    }

    /// Lists sessions where the student is initiator or invitee, newest id
    /// first.
    pub fn list_sessions_for(&self, username: &str) -> Result<Vec<SessionRecord>, DbError> {
        self.session_query(
            &format!(
                "{SESSION_SELECT}
                 WHERE initiator_username = ?1 OR invitee_username = ?1
                 ORDER BY id DESC"
            ),
            params![username],
        )
    }

    /// Lists the student's incoming proposed sessions, newest id first.
    pub fn list_proposed_for_invitee(&self, invitee: &str) -> Result<Vec<SessionRecord>, DbError> {
        self.session_query(
            &format!(
                "{SESSION_SELECT}
                 WHERE invitee_username = ? AND status = 'Proposed'
                 ORDER BY id DESC"
            ),
            params![invitee],
        )
    }

    /// Lists the student's confirmed sessions in either role.
    pub fn list_confirmed_for(&self, username: &str) -> Result<Vec<SessionRecord>, DbError> {
        self.session_query(
            &format!(
                "{SESSION_SELECT}
                 WHERE status = 'Confirmed'
                   AND (initiator_username = ?1 OR invitee_username = ?1)
                 ORDER BY id DESC"
            ),
            params![username],
        )
    }

    fn session_query(
        &self,
        sql: &str,
        bindings: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<SessionRecord>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(bindings, session_row_fields)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(parse_session_row(row?)?);
        }
        Ok(sessions)
    }
}

const SESSION_SELECT: &str = "
    SELECT id, course_code, initiator_username, invitee_username,
           day_of_week, start_time, end_time, status
    FROM session";

/// Raw session columns before day/status parsing.
type SessionRow = (i64, String, String, String, String, String, String, String);

fn session_row_fields(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn parse_session_row(row: SessionRow) -> Result<SessionRecord, DbError> {
    let (id, course_code, initiator, invitee, day, start_time, end_time, status) = row;
    let day = day.parse().map_err(|err: buddy_core::UnknownDay| DbError::InvalidRecord {
        table: "session",
        id,
        message: err.to_string(),
    })?;
    let status = status
        .parse()
        .map_err(|err: buddy_core::UnknownStatus| DbError::InvalidRecord {
            table: "session",
            id,
            message: err.to_string(),
        })?;
    Ok(SessionRecord {
        id,
        course_code,
        initiator,
        invitee,
        day,
        start_time,
        end_time,
        status,
    })
}

fn session_slot(session: &SessionRecord) -> Result<Slot, DbError> {
    let start = buddy_core::to_minutes(&session.start_time);
    let end = buddy_core::to_minutes(&session.end_time);
    match (start, end) {
        (Some(start), Some(end)) => Ok(Slot {
            day: session.day,
            start,
            end,
        }),
        _ => Err(DbError::InvalidRecord {
            table: "session",
            id: session.id,
            message: format!(
                "unparseable times {:?}..{:?}",
                session.start_time, session.end_time
            ),
        }),
    }
}

fn fetch_student_row(conn: &Connection, username: &str) -> Result<Option<Student>, DbError> {
    let mut stmt = conn.prepare("SELECT username, full_name FROM student WHERE username = ?")?;
    let student = stmt
        .query_row(params![username], |row| {
            Ok(Student {
                username: row.get(0)?,
                full_name: row.get(1)?,
            })
        })
        .optional()?;
    Ok(student)
}

fn enrollments(conn: &Connection, username: &str) -> Result<Vec<String>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT course_code FROM enrollment WHERE username = ? ORDER BY course_code",
    )?;
    let rows = stmt.query_map(params![username], |row| row.get(0))?;
    let mut courses = Vec::new();
    for row in rows {
        courses.push(row?);
    }
    Ok(courses)
}

fn availability_rows(conn: &Connection, username: &str) -> Result<Vec<AvailabilityRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, day_of_week, start_time, end_time FROM availability WHERE username = ?",
    )?;
    let rows = stmt.query_map(params![username], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;
    let mut windows = Vec::new();
    for row in rows {
        let (id, day, start_time, end_time) = row?;
        let day: Day = day
            .parse()
            .map_err(|err: buddy_core::UnknownDay| DbError::InvalidRecord {
                table: "availability",
                id,
                message: err.to_string(),
            })?;
        windows.push(AvailabilityRow {
            id,
            day,
            start_time,
            end_time,
        });
    }
    // Explicit ordinal sort instead of an ad-hoc SQL CASE expression.
    windows.sort_by_key(|window| {
        (
            window.day.ordinal(),
            buddy_core::to_minutes(&window.start_time),
        )
    });
    Ok(windows)
}

fn availability_index(conn: &Connection, username: &str) -> Result<AvailabilityIndex, DbError> {
    let rows = availability_rows(conn, username)?;
    let mut index = AvailabilityIndex::new();
    for row in rows {
        let start = buddy_core::to_minutes(&row.start_time);
        let end = buddy_core::to_minutes(&row.end_time);
        match (start, end) {
            (Some(start), Some(end)) => {
                index.insert(row.day, buddy_core::Window::new(start, end));
            }
            _ => {
                return Err(DbError::InvalidRecord {
                    table: "availability",
                    id: row.id,
                    message: format!(
                        "unparseable times {:?}..{:?}",
                        row.start_time, row.end_time
                    ),
                });
            }
        }
    }
    Ok(index)
}

fn confirmed_slots(conn: &Connection, username: &str) -> Result<Vec<Slot>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "{SESSION_SELECT}
         WHERE status = 'Confirmed'
           AND (initiator_username = ?1 OR invitee_username = ?1)"
    ))?;
    let rows = stmt.query_map(params![username], session_row_fields)?;
    let mut slots = Vec::new();
    for row in rows {
        let session = parse_session_row(row?)?;
        slots.push(session_slot(&session)?);
    }
    Ok(slots)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// Classifies a `rusqlite` error as a uniqueness or foreign-key violation so
/// callers can translate it into the matching [`Rejection`].
fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some(ConstraintKind::Unique),
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
            _ => None,
        },
        _ => None,
    }
}
