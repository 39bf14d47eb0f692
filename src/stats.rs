//! Derived statistics and display-time normalization
//!
//! Submission timestamps arrive as strings. Parsing accepts RFC 3339 and the
//! service's `YYYY-MM-DD HH:MM:SS` shape (read as UTC). Unparseable values
//! are recovered locally: excluded from today counts, rendered as a literal
//! `"Invalid Date"` marker. They never fail a sync batch.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

use crate::api::Submission;

/// Display offset: +05:30, applied as a fixed shift.
/// This is not a timezone-aware conversion; no DST, no locale.
const DISPLAY_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Marker rendered in place of an unparseable timestamp
pub const INVALID_DATE: &str = "Invalid Date";

/// Parse a submission timestamp
///
/// Returns `None` for anything outside the accepted formats.
pub fn parse_time(time_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(time_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Bare datetime without offset, as the service historically sent it
    if let Ok(naive) = NaiveDateTime::parse_from_str(time_str, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    None
}

/// Whether the timestamp falls on the machine-local current calendar date
///
/// Unparseable timestamps are never "today".
pub fn is_today(time_str: &str) -> bool {
    match parse_time(time_str) {
        Some(dt) => dt.with_timezone(&Local).date_naive() == Local::now().date_naive(),
        None => false,
    }
}

/// Count of a user's submissions made today (local calendar date)
pub fn today_count(submissions: &[Submission]) -> usize {
    submissions.iter().filter(|s| is_today(&s.time)).count()
}

/// Format a timestamp for display, shifted by the fixed +05:30 offset
///
/// Output shape: `01 Jan 2024, 05:30:00 AM` (two-digit day, abbreviated
/// month, four-digit year, 12-hour clock). Unparseable input renders the
/// [`INVALID_DATE`] marker.
pub fn display_time(time_str: &str) -> String {
    let Some(dt) = parse_time(time_str) else {
        return INVALID_DATE.to_string();
    };

    let offset = FixedOffset::east_opt(DISPLAY_OFFSET_SECS).expect("display offset in range");
    dt.with_timezone(&offset)
        .format("%d %b %Y, %I:%M:%S %p")
        .to_string()
}
