//! Structured rejection reasons for scheduling operations.
//!
//! Every operation that can refuse a request returns one of these instead of
//! panicking or printing; the front-end decides how to render them.

use thiserror::Error;

/// Broad rejection categories, useful for exit codes and front-end grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Malformed input: day/time text, inverted or too-short interval, empty field.
    Validation,
    /// A referenced student or session does not exist.
    NotFound,
    /// The request collides with existing state.
    Conflict,
    /// The actor is not allowed to perform this action.
    Authorization,
}

/// A recoverable refusal of a scheduling request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("day must be one of Mon..Sun, got {raw:?}")]
    UnrecognizedDay { raw: String },

    #[error("time must be \"HH:MM\" (24-hour) or \"H:MM AM/PM\", got {raw:?}")]
    UnparseableTime { raw: String },

    #[error("start must be earlier than end")]
    StartNotBeforeEnd,

    #[error("session must last at least {minimum} minutes, got {requested}")]
    SessionTooShort { requested: u16, minimum: u16 },

    #[error("no student with username {username:?}")]
    UnknownStudent { username: String },

    #[error("no session with id {id}")]
    UnknownSession { id: i64 },

    #[error("username {username:?} is already taken")]
    DuplicateUsername { username: String },

    #[error("{username} is already enrolled in {course}")]
    DuplicateEnrollment { username: String, course: String },

    #[error("an identical availability window already exists")]
    DuplicateAvailability,

    #[error("{username} is not enrolled in {course}")]
    NotEnrolled { username: String, course: String },

    #[error("requested slot lies outside every qualifying availability overlap")]
    OutsideOverlap,

    #[error("slot overlaps a confirmed session on the same day")]
    ConfirmedSessionOverlap,

    #[error("only the invitee may confirm a session")]
    NotInvitee,
}

impl Rejection {
    /// Maps each variant onto the coarse taxonomy.
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::Empty { .. }
            | Self::UnrecognizedDay { .. }
            | Self::UnparseableTime { .. }
            | Self::StartNotBeforeEnd
            | Self::SessionTooShort { .. } => RejectionKind::Validation,
            Self::UnknownStudent { .. } | Self::UnknownSession { .. } => RejectionKind::NotFound,
            Self::DuplicateUsername { .. }
            | Self::DuplicateEnrollment { .. }
            | Self::DuplicateAvailability
            | Self::NotEnrolled { .. }
            | Self::OutsideOverlap
            | Self::ConfirmedSessionOverlap => RejectionKind::Conflict,
            Self::NotInvitee => RejectionKind::Authorization,
        }
    }
}
