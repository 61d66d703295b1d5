//! Classmate screening: turns course-sharing candidates into suggestions.

use serde::Serialize;

use crate::availability::{AvailabilityIndex, first_qualifying_overlap};
use crate::day::Day;
use crate::time::format_minutes;

/// A classmate sharing at least one course, before overlap screening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub username: String,
    pub full_name: String,
    pub shared_courses: Vec<String>,
}

/// A match suggestion with one example slot where both users are free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub username: String,
    pub full_name: String,
    /// Shared course codes, ascending.
    pub shared_courses: Vec<String>,
    pub overlap_day: Day,
    /// Zero-padded 24-hour "HH:MM".
    pub overlap_start: String,
    pub overlap_end: String,
}

/// Screens one candidate against the requesting user's availability.
///
/// Keeps the candidate only if some window pair overlaps by at least 30
/// minutes anywhere in the week; the first such overlap (day order, then
/// stored slot order) becomes the example slot. Candidates without one are
/// dropped entirely rather than suggested with an empty slot.
#[must_use]
pub fn screen_candidate(
    candidate: Candidate,
    mine: &AvailabilityIndex,
    theirs: &AvailabilityIndex,
) -> Option<Suggestion> {
    let Some(slot) = first_qualifying_overlap(mine, theirs) else {
        tracing::debug!(username = %candidate.username, "no qualifying overlap, dropping candidate");
        return None;
    };
    let mut shared_courses = candidate.shared_courses;
    shared_courses.sort();
    Some(Suggestion {
        username: candidate.username,
        full_name: candidate.full_name,
        shared_courses,
        overlap_day: slot.day,
        overlap_start: format_minutes(slot.start),
        overlap_end: format_minutes(slot.end),
    })
}
