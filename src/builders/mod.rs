//! Record builders
//!
//! Each builder consumes one raw log unit and produces the corresponding
//! typed record, delegating timestamp, name and address recovery to the leaf
//! parsers. Builders never fail on malformed input: missing or unparseable
//! source fields become absent attributes, and a record is always returned;
//! callers decide whether an all-absent record is usable.

mod reading;
mod ride;
mod rider;

pub use reading::reading_from_line_pair;
pub use ride::ride_from_log_line;
pub use rider::{
    address_from_log_line, bike_serial_from_log_line, email_from_log_line, rider_from_log_line,
};

/// The shape of one raw log line, decided by the emitter's markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `[SYSTEM]` line: rider identity payload, doubles as the ride start.
    RiderInfo,
    /// `[INFO]: Ride` line: resistance tick, first line of a reading pair.
    RideTick,
    /// `[INFO]: Telemetry` line: second line of a reading pair.
    TelemetryTick,
    Unrecognized,
}

/// Classify a raw log line by its marker.
pub fn classify_line(line: &str) -> LineKind {
    if line.contains("[SYSTEM]") {
        LineKind::RiderInfo
    } else if line.contains("[INFO]: Ride") {
        LineKind::RideTick
    } else if line.contains("[INFO]: Telemetry") {
        LineKind::TelemetryTick
    } else {
        LineKind::Unrecognized
    }
}
