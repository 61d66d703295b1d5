//! Per-user availability index and overlap search.
//!
//! The index maps each of the 7 day codes to that user's windows in stored
//! order. It is rebuilt from the record store on every query; windows for the
//! same day are kept as-is, so overlapping or duplicate-ish windows coexist.

use crate::day::Day;
use crate::time::{interval_includes, overlap_minutes};

/// Minimum intersection, in minutes, for a window pair to qualify as a match.
pub const MIN_OVERLAP_MINUTES: u16 = 30;

/// A `[start, end)` window in minute-of-day offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u16,
    pub end: u16,
}

impl Window {
    #[must_use]
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

/// A user's weekly availability, one window list per day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    by_day: [Vec<Window>; 7],
}

impl AvailabilityIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from `(day, window)` pairs, preserving input order
    /// within each day.
    pub fn from_windows(windows: impl IntoIterator<Item = (Day, Window)>) -> Self {
        let mut index = Self::new();
        for (day, window) in windows {
            index.insert(day, window);
        }
        index
    }

    pub fn insert(&mut self, day: Day, window: Window) {
        self.by_day[day_slot(day)].push(window);
    }

    /// The user's windows on `day`, empty when none.
    #[must_use]
    pub fn windows(&self, day: Day) -> &[Window] {
        &self.by_day[day_slot(day)]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_day.iter().all(Vec::is_empty)
    }
}

const fn day_slot(day: Day) -> usize {
    day.ordinal() as usize - 1
}

/// A concrete shared slot discovered between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapSlot {
    pub day: Day,
    pub start: u16,
    pub end: u16,
}

/// Finds the first window pair whose intersection is at least
/// [`MIN_OVERLAP_MINUTES`], scanning days Mon through Sun and window lists in
/// stored order. First-found semantics are load-bearing: callers rely on the
/// result being reproducible, not optimal.
#[must_use]
pub fn first_qualifying_overlap(
    mine: &AvailabilityIndex,
    theirs: &AvailabilityIndex,
) -> Option<OverlapSlot> {
    for day in Day::ALL {
        for my_window in mine.windows(day) {
            for their_window in theirs.windows(day) {
                let overlap = overlap_minutes(
                    my_window.start,
                    my_window.end,
                    their_window.start,
                    their_window.end,
                );
                if overlap >= MIN_OVERLAP_MINUTES {
                    let start = my_window.start.max(their_window.start);
                    return Some(OverlapSlot {
                        day,
                        start,
                        end: start + overlap,
                    });
                }
            }
        }
    }
    None
}

/// Whether `[start, end)` on `day` lies fully inside some single window-pair
/// overlap that itself qualifies (>= 30 minutes).
///
/// Containment is checked against each pair's own overlap bounds, never the
/// union of all overlaps.
#[must_use]
pub fn slot_within_qualifying_overlap(
    mine: &AvailabilityIndex,
    theirs: &AvailabilityIndex,
    day: Day,
    start: u16,
    end: u16,
) -> bool {
    mine.windows(day).iter().any(|my_window| {
        theirs.windows(day).iter().any(|their_window| {
            let overlap = overlap_minutes(
                my_window.start,
                my_window.end,
                their_window.start,
                their_window.end,
            );
            overlap >= MIN_OVERLAP_MINUTES
                && interval_includes(
                    start,
                    end,
                    my_window.start.max(their_window.start),
                    my_window.end.min(their_window.end),
                )
        })
    })
}
