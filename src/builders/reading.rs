//! Telemetry reading builder
//!
//! One reading is a pair of newline-joined lines: a resistance tick and,
//! usually, the telemetry tick that follows it. A one-line-only pair is a
//! normal shape (resistance-only tick), not an error.

use chrono::{DateTime, Utc};

use crate::parse::{extract_datetime, parse_kv_line};
use crate::types::ReadingRecord;

/// Build a reading record from a raw line pair.
///
/// `ride_id` is the caller-supplied surrogate key; `start_time` is the owning
/// ride's start, against which elapsed seconds are computed. The elapsed time
/// is populated only when the first line's timestamp parses and is strictly
/// after `start_time`, and is never negative.
pub fn reading_from_line_pair(
    pair: &str,
    ride_id: i64,
    start_time: Option<DateTime<Utc>>,
) -> ReadingRecord {
    let mut lines = pair.lines();
    let ride_line = lines.next().unwrap_or("");
    let telemetry_line = lines.next().filter(|l| !l.trim().is_empty());

    let ride_entries = parse_kv_line(ride_line);
    let resistance = ride_entries
        .get("resistance")
        .and_then(|v| v.parse().ok());

    let elapsed_time = match (extract_datetime(ride_line), start_time) {
        (Some(at), Some(start)) if at > start => Some((at - start).num_seconds()),
        _ => None,
    };

    let (heart_rate, rpm, power) = match telemetry_line {
        Some(line) => {
            let entries = parse_kv_line(line);
            (
                entries.get("hrt").and_then(|v| v.parse().ok()),
                entries.get("rpm").and_then(|v| v.parse().ok()),
                entries.get("power").and_then(|v| v.parse().ok()),
            )
        }
        None => (None, None, None),
    };

    ReadingRecord {
        ride_id,
        heart_rate,
        power,
        rpm,
        resistance,
        elapsed_time,
    }
}
