//! Timestamp extraction
//!
//! Bike hardware stamps each log line with a leading
//! `YYYY-MM-DD HH:MM:SS[.ffffff]` token pair. Corrupted hardware clocks are
//! expected in the field, so extraction is two-stage: a syntactic parse, then
//! a plausibility check. Both failures yield absent, never an error, so a bad
//! clock is silently excluded instead of corrupting elapsed-time math.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// Extract the leading timestamp from a raw log line.
///
/// The candidate is the first two whitespace-separated tokens. Format
/// selection follows the hardware's emitter: fractional seconds are expected
/// whenever the line contains a `.` anywhere, and not otherwise.
pub fn extract_datetime(line: &str) -> Option<DateTime<Utc>> {
    let mut tokens = line.split_whitespace();
    let date = tokens.next()?;
    let time = tokens.next()?;
    let candidate = format!("{date} {time}");

    let format = if line.contains('.') {
        "%Y-%m-%d %H:%M:%S%.f"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };

    let parsed = NaiveDateTime::parse_from_str(&candidate, format)
        .ok()?
        .and_utc();

    if is_plausible(parsed) {
        Some(parsed)
    } else {
        None
    }
}

/// A timestamp is plausible when it is not before 1900-01-01 and not in the
/// future.
fn is_plausible(dt: DateTime<Utc>) -> bool {
    dt.year() >= 1900 && dt <= Utc::now()
}
