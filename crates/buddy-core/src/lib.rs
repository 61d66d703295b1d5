//! Core scheduling logic for the study buddy matcher.
//!
//! This crate contains the fundamental types and logic for:
//! - Day/time normalization: weekday codes and minute-of-day offsets
//! - Interval algebra: overlap and containment on half-open windows
//! - Matching: finding classmates with a qualifying availability overlap
//! - Sessions: slot validation and confirmed-session conflict checks

pub mod availability;
pub mod day;
pub mod error;
pub mod matching;
pub mod session;
pub mod time;

pub use availability::{
    AvailabilityIndex, MIN_OVERLAP_MINUTES, OverlapSlot, Window, first_qualifying_overlap,
    slot_within_qualifying_overlap,
};
pub use day::{Day, UnknownDay};
pub use error::{Rejection, RejectionKind};
pub use matching::{Candidate, Suggestion, screen_candidate};
pub use session::{
    MIN_SESSION_MINUTES, SessionStatus, Slot, UnknownStatus, conflicts_with_confirmed,
    validate_duration, validate_slot,
};
pub use time::{format_minutes, interval_includes, overlap_minutes, parse_time, to_minutes};
