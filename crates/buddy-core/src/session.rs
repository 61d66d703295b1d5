//! Session lifecycle states and slot validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::day::Day;
use crate::error::Rejection;
use crate::time::{overlap_minutes, to_minutes};

/// Minimum session length in minutes.
pub const MIN_SESSION_MINUTES: u16 = 30;

/// Lifecycle states of a study session. Confirmed is terminal; there is no
/// reject or cancel transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Proposed,
    Confirmed,
}

impl SessionStatus {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "Proposed",
            Self::Confirmed => "Confirmed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Proposed" => Ok(Self::Proposed),
            "Confirmed" => Ok(Self::Confirmed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl Serialize for SessionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown status strings.
#[derive(Debug, Clone)]
pub struct UnknownStatus(String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown session status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// A validated day/start/end triple in minute offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub day: Day,
    pub start: u16,
    pub end: u16,
}

impl Slot {
    #[must_use]
    pub const fn duration(&self) -> u16 {
        self.end - self.start
    }
}

/// Normalizes raw day and time text into a [`Slot`], checking in order: the
/// day normalizes, both times parse, and start is strictly before end.
pub fn validate_slot(day_raw: &str, start_raw: &str, end_raw: &str) -> Result<Slot, Rejection> {
    let day = Day::parse(day_raw).ok_or_else(|| Rejection::UnrecognizedDay {
        raw: day_raw.to_string(),
    })?;
    let start = to_minutes(start_raw).ok_or_else(|| Rejection::UnparseableTime {
        raw: start_raw.to_string(),
    })?;
    let end = to_minutes(end_raw).ok_or_else(|| Rejection::UnparseableTime {
        raw: end_raw.to_string(),
    })?;
    if start >= end {
        return Err(Rejection::StartNotBeforeEnd);
    }
    Ok(Slot { day, start, end })
}

/// Rejects slots shorter than [`MIN_SESSION_MINUTES`].
pub fn validate_duration(slot: &Slot) -> Result<(), Rejection> {
    if slot.duration() < MIN_SESSION_MINUTES {
        return Err(Rejection::SessionTooShort {
            requested: slot.duration(),
            minimum: MIN_SESSION_MINUTES,
        });
    }
    Ok(())
}

/// Whether `slot` time-overlaps any same-day slot in `confirmed`, by even a
/// single minute. Half-open intervals, so back-to-back slots do not conflict.
pub fn conflicts_with_confirmed(slot: &Slot, confirmed: impl IntoIterator<Item = Slot>) -> bool {
    confirmed.into_iter().any(|other| {
        other.day == slot.day && overlap_minutes(slot.start, slot.end, other.start, other.end) > 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectionKind;

    #[test]
    fn status_roundtrips() {
        for status in [SessionStatus::Proposed, SessionStatus::Confirmed] {
            let parsed: SessionStatus = status.as_str().parse().expect("should parse");
            assert_eq!(parsed, status);
        }
        assert!("Cancelled".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn validate_slot_normalizes_inputs() {
        let slot = validate_slot("tuesday", "10:00", "5:30 pm").unwrap();
        assert_eq!(slot.day, Day::Tue);
        assert_eq!(slot.start, 600);
        assert_eq!(slot.end, 1050);
        assert_eq!(slot.duration(), 450);
    }

    #[test]
    fn validate_slot_fails_fast_in_order() {
        // Bad day reported before bad times
        let err = validate_slot("Funday", "nope", "nope").unwrap_err();
        assert!(matches!(err, Rejection::UnrecognizedDay { .. }));

        let err = validate_slot("Mon", "25:00", "26:00").unwrap_err();
        assert!(matches!(err, Rejection::UnparseableTime { .. }));
        assert_eq!(err.kind(), RejectionKind::Validation);

        let err = validate_slot("Mon", "12:00", "10:00").unwrap_err();
        assert_eq!(err, Rejection::StartNotBeforeEnd);

        // Equal start and end is inverted too
        let err = validate_slot("Mon", "10:00", "10:00").unwrap_err();
        assert_eq!(err, Rejection::StartNotBeforeEnd);
    }

    #[test]
    fn duration_threshold_is_thirty_minutes() {
        let short = Slot {
            day: Day::Mon,
            start: 600,
            end: 620,
        };
        assert_eq!(
            validate_duration(&short),
            Err(Rejection::SessionTooShort {
                requested: 20,
                minimum: 30,
            })
        );

        let exact = Slot {
            day: Day::Mon,
            start: 600,
            end: 630,
        };
        assert_eq!(validate_duration(&exact), Ok(()));
    }

    #[test]
    fn confirmed_conflict_is_zero_tolerance() {
        let slot = Slot {
            day: Day::Mon,
            start: 570, // 09:30
            end: 630,   // 10:30
        };
        let confirmed = Slot {
            day: Day::Mon,
            start: 540, // 09:00
            end: 600,   // 10:00
        };
        assert!(conflicts_with_confirmed(&slot, [confirmed]));

        // Back-to-back is allowed: half-open intervals
        let adjacent = Slot {
            day: Day::Mon,
            start: 600,
            end: 660,
        };
        assert!(!conflicts_with_confirmed(&adjacent, [confirmed]));

        // Same times on a different day never conflict
        let other_day = Slot {
            day: Day::Tue,
            ..slot
        };
        assert!(!conflicts_with_confirmed(&other_day, [confirmed]));
    }
}
