//! Clock-time parsing and half-open interval algebra on minute offsets.
//!
//! Times are compared as minute-of-day offsets (0..=1439). The original
//! string form is kept by the store for display; everything here works on the
//! normalized integers.

/// Parses `"HH:MM"` (24-hour) or `"H:MM am/pm"` (12-hour) into a
/// 24-hour `(hour, minute)` pair.
///
/// The 12-hour form allows optional spacing and periods around the meridiem
/// (`"5:30 PM"`, `"11:05am"`, `"12:00 a.m."`) and follows the standard noon
/// and midnight convention: 12pm is 12:00, 12am is 00:00. Anything else
/// yields `None`.
#[must_use]
pub fn parse_time(text: &str) -> Option<(u16, u16)> {
    let lowered = text.trim().to_ascii_lowercase();
    let (hour, minute, rest) = parse_clock(&lowered)?;
    if minute > 59 {
        return None;
    }
    let rest = rest.trim_start();
    if rest.is_empty() {
        // Strict 24-hour HH:MM
        return (hour <= 23).then_some((hour, minute));
    }
    let meridiem = parse_meridiem(rest)?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (meridiem, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, h) => h + 12,
    };
    Some((hour, minute))
}

/// Parses a time string into its minute-of-day offset.
#[must_use]
pub fn to_minutes(text: &str) -> Option<u16> {
    let (hour, minute) = parse_time(text)?;
    Some(hour * 60 + minute)
}

/// Formats a minute-of-day offset as zero-padded 24-hour `"HH:MM"`.
#[must_use]
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Length in minutes of the intersection of two `[start, end)` intervals.
///
/// Returns 0 when the intervals are disjoint or either is inverted.
#[must_use]
pub const fn overlap_minutes(a_start: u16, a_end: u16, b_start: u16, b_end: u16) -> u16 {
    let start = if a_start > b_start { a_start } else { b_start };
    let end = if a_end < b_end { a_end } else { b_end };
    end.saturating_sub(start)
}

/// Whether `[inner_start, inner_end)` lies fully inside
/// `[outer_start, outer_end)`, boundaries inclusive.
#[must_use]
pub const fn interval_includes(
    inner_start: u16,
    inner_end: u16,
    outer_start: u16,
    outer_end: u16,
) -> bool {
    outer_start <= inner_start && inner_end <= outer_end
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Splits a leading run of ASCII digits off the front of `s`.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Parses `H:MM` / `HH:MM` with optional spaces around the colon.
/// Returns the hour, minute, and the unconsumed remainder.
fn parse_clock(s: &str) -> Option<(u16, u16, &str)> {
    let (hour_digits, rest) = split_digits(s);
    if hour_digits.is_empty() || hour_digits.len() > 2 {
        return None;
    }
    let rest = rest.trim_start().strip_prefix(':')?.trim_start();
    let (minute_digits, rest) = split_digits(rest);
    if minute_digits.len() != 2 {
        return None;
    }
    let hour = hour_digits.parse().ok()?;
    let minute = minute_digits.parse().ok()?;
    Some((hour, minute, rest))
}

/// Parses a lowercased meridiem suffix: `a`/`p`, optional period, optional
/// spaces, `m`, optional period, end of input.
fn parse_meridiem(rest: &str) -> Option<Meridiem> {
    let (meridiem, rest) = match rest.as_bytes().first()? {
        b'a' => (Meridiem::Am, &rest[1..]),
        b'p' => (Meridiem::Pm, &rest[1..]),
        _ => return None,
    };
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let rest = rest.trim_start().strip_prefix('m')?;
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    rest.is_empty().then_some(meridiem)
}
