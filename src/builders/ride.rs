//! Ride session builder
//!
//! A ride starts on the same line that carries the rider payload; the ride
//! builder only needs the rider id and the line's timestamp. The hardware
//! stamps the line roughly half a second after the ride actually begins, so
//! the start time subtracts a fixed 500 ms calibration offset.

use chrono::Duration;

use crate::parse::{extract_datetime, parse_embedded_mapping};
use crate::types::RideRecord;

/// Calibration offset between the logged timestamp and the true ride start.
const START_OFFSET_MS: i64 = 500;

/// Build a ride record from one ride-start log line.
///
/// `bike_id` is the caller-supplied surrogate key for the bike this session
/// runs on; the builder does not resolve serial numbers itself.
pub fn ride_from_log_line(line: &str, bike_id: i64) -> RideRecord {
    let payload = parse_embedded_mapping(line);

    RideRecord {
        rider_id: payload.get("user_id").and_then(|v| v.as_i64()),
        bike_id,
        start_time: extract_datetime(line)
            .map(|dt| dt - Duration::milliseconds(START_OFFSET_MS)),
    }
}
