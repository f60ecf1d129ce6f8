//! Pipeline orchestration
//!
//! This module provides the public API for spinlog. It assembles raw log
//! lines into sessions: a rider-info line opens a ride, resistance and
//! telemetry ticks are joined into reading pairs, and each reading with a
//! heart rate is checked against the rider's safe zone and fed to the
//! anomaly streak tracker.
//!
//! The processor owns the only long-lived state (the streak tracker and the
//! session context); the builders themselves are pure. Surrogate ride and
//! bike ids are generated locally and the persistence collaborator may remap
//! them on load.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::alert::HeartRateAlert;
use crate::builders::{
    address_from_log_line, bike_serial_from_log_line, classify_line, reading_from_line_pair,
    ride_from_log_line, rider_from_log_line, LineKind,
};
use crate::error::TransformError;
use crate::streak::{AnomalyStreakTracker, RideKey, StreakConfig};
use crate::types::{Record, RiderRecord};
use crate::zones::{current_age, safe_zone, HeartRateZone};

/// One pipeline output: a typed record for the persistence collaborator or
/// an alert payload for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Record(Record),
    Alert(HeartRateAlert),
}

/// Session context for the ride currently receiving readings.
struct ActiveRide {
    key: RideKey,
    start_time: Option<DateTime<Utc>>,
    /// Absent when the rider's birthdate is unknown; heart-rate checks are
    /// disabled for the ride in that case.
    zone: Option<HeartRateZone>,
    rider: RiderRecord,
}

/// Stateful processor for a stream of raw log lines.
///
/// Feed lines in arrival order via [`process_line`]; call [`finish`] at end
/// of stream to flush the trailing reading. One processor handles one
/// ordered stream; partition streams by ride upstream for concurrency.
///
/// [`process_line`]: SessionProcessor::process_line
/// [`finish`]: SessionProcessor::finish
pub struct SessionProcessor {
    tracker: AnomalyStreakTracker,
    bike_ids: HashMap<String, i64>,
    next_bike_id: i64,
    next_ride_id: i64,
    current: Option<ActiveRide>,
    /// Resistance tick waiting for its telemetry line.
    pending_tick: Option<String>,
}

impl Default for SessionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProcessor {
    /// Create a processor with default streak settings.
    pub fn new() -> Self {
        Self::with_config(StreakConfig::default())
    }

    /// Create a processor with specific streak settings.
    pub fn with_config(config: StreakConfig) -> Self {
        Self {
            tracker: AnomalyStreakTracker::new(config),
            bike_ids: HashMap::new(),
            next_bike_id: 1,
            next_ride_id: 1,
            current: None,
            pending_tick: None,
        }
    }

    /// Process one raw log line, returning any outputs it completes.
    ///
    /// A rider-info line closes the previous ride and emits its rider,
    /// address and ride records. A resistance tick is held until the next
    /// line decides whether it pairs with a telemetry tick. Unrecognized
    /// lines are ignored.
    pub fn process_line(&mut self, line: &str) -> Vec<Output> {
        let mut out = Vec::new();

        match classify_line(line) {
            LineKind::RiderInfo => {
                self.flush_pending(&mut out);
                self.close_current_ride();
                self.start_session(line, &mut out);
            }
            LineKind::RideTick => {
                self.flush_pending(&mut out);
                self.pending_tick = Some(line.to_string());
            }
            LineKind::TelemetryTick => match self.pending_tick.take() {
                Some(tick) => {
                    let pair = format!("{tick}\n{line}");
                    self.emit_reading(&pair, &mut out);
                }
                None => warn!("telemetry tick with no preceding resistance tick; dropped"),
            },
            LineKind::Unrecognized => {
                if !line.trim().is_empty() {
                    debug!(line, "ignoring unrecognized log line");
                }
            }
        }

        out
    }

    /// Flush the trailing reading and close the open ride.
    pub fn finish(&mut self) -> Vec<Output> {
        let mut out = Vec::new();
        self.flush_pending(&mut out);
        self.close_current_ride();
        out
    }

    /// Serialize streak-tracker state for persistence across restarts.
    pub fn save_tracker_state(&self) -> Result<String, TransformError> {
        self.tracker.to_json()
    }

    /// Restore streak-tracker state saved with [`save_tracker_state`].
    ///
    /// [`save_tracker_state`]: SessionProcessor::save_tracker_state
    pub fn load_tracker_state(&mut self, json: &str) -> Result<(), TransformError> {
        self.tracker = AnomalyStreakTracker::from_json(json)?;
        Ok(())
    }

    fn start_session(&mut self, line: &str, out: &mut Vec<Output>) {
        let rider = rider_from_log_line(line);
        let address = address_from_log_line(line);

        if rider.id.is_none() {
            warn!("rider-info line carries no user id");
        }

        let bike_id = self.resolve_bike_id(bike_serial_from_log_line(line));
        let ride = ride_from_log_line(line, bike_id);
        let ride_id = self.next_ride_id;
        self.next_ride_id += 1;

        let zone = rider
            .birthdate
            .map(|birthdate| safe_zone(current_age(birthdate), rider.gender));
        if zone.is_none() {
            warn!(
                rider_id = ?rider.id,
                "rider has no birthdate; heart-rate checks disabled for this ride"
            );
        }

        self.current = Some(ActiveRide {
            key: RideKey {
                rider_id: rider.id,
                ride_id,
            },
            start_time: ride.start_time,
            zone,
            rider: rider.clone(),
        });

        out.push(Output::Record(Record::Rider(rider)));
        out.push(Output::Record(Record::Address(address)));
        out.push(Output::Record(Record::Ride(ride)));
    }

    fn emit_reading(&mut self, pair: &str, out: &mut Vec<Output>) {
        let (key, start_time, zone) = match &self.current {
            Some(active) => (active.key, active.start_time, active.zone),
            None => {
                warn!("reading received with no open ride; dropped");
                return;
            }
        };

        let reading = reading_from_line_pair(pair, key.ride_id, start_time);

        let mut run = None;
        if let (Some(hr), Some(zone)) = (reading.heart_rate, zone) {
            run = self
                .tracker
                .observe(key, hr, zone.is_abnormal(hr), reading.elapsed_time);
        }

        out.push(Output::Record(Record::Reading(reading)));
        if let (Some(run), Some(active)) = (run, &self.current) {
            out.push(Output::Alert(HeartRateAlert::new(&active.rider, run)));
        }
    }

    fn flush_pending(&mut self, out: &mut Vec<Output>) {
        if let Some(tick) = self.pending_tick.take() {
            self.emit_reading(&tick, out);
        }
    }

    fn close_current_ride(&mut self) {
        if let Some(active) = self.current.take() {
            self.tracker.end_ride(&active.key);
        }
    }

    fn resolve_bike_id(&mut self, serial: Option<String>) -> i64 {
        let next = &mut self.next_bike_id;
        match serial {
            Some(serial) => *self.bike_ids.entry(serial).or_insert_with(|| {
                let id = *next;
                *next += 1;
                id
            }),
            None => {
                let id = *next;
                *next += 1;
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Gender, ReadingRecord};
    use pretty_assertions::assert_eq;

    // 1980-01-01 as epoch milliseconds.
    const RIDER_LINE: &str = "2022-07-25 16:13:26.426084 mendoza v9: [SYSTEM] data = \
        {'user_id': 815, 'name': 'Mr Wayne Fitzgerald', 'gender': 'male', \
        'address': '64 Winter Lane, York, YO49 4HU', 'date_of_birth': 315532800000, \
        'email_address': 'wayne@example.com', 'height_cm': 187, 'weight_kg': 82, \
        'account_create_date': 1641254400000, 'bike_serial': 'T8169'}";

    fn ride_tick(offset_secs: u32, resistance: i64) -> String {
        format!(
            "2022-07-25 16:14:{:02}.709120 mendoza v9: [INFO]: Ride - duration = 1; resistance = {}",
            offset_secs, resistance
        )
    }

    fn telemetry_tick(offset_secs: u32, hrt: i64) -> String {
        format!(
            "2022-07-25 16:14:{:02}.959348 mendoza v9: [INFO]: Telemetry - hrt = {}; rpm = 27; power = 5.1",
            offset_secs, hrt
        )
    }

    fn readings_of(outputs: &[Output]) -> Vec<&ReadingRecord> {
        outputs
            .iter()
            .filter_map(|o| match o {
                Output::Record(Record::Reading(r)) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_rider_line_opens_session_with_three_records() {
        let mut processor = SessionProcessor::new();
        let outputs = processor.process_line(RIDER_LINE);

        assert_eq!(outputs.len(), 3);
        match &outputs[0] {
            Output::Record(Record::Rider(r)) => {
                assert_eq!(r.id, Some(815));
                assert_eq!(r.gender, Some(Gender::Male));
            }
            other => panic!("expected rider record, got {other:?}"),
        }
        match &outputs[1] {
            Output::Record(Record::Address(a)) => {
                assert_eq!(a.city.as_deref(), Some("York"))
            }
            other => panic!("expected address record, got {other:?}"),
        }
        match &outputs[2] {
            Output::Record(Record::Ride(r)) => {
                assert_eq!(r.rider_id, Some(815));
                assert_eq!(r.bike_id, 1);
                assert!(r.start_time.is_some());
            }
            other => panic!("expected ride record, got {other:?}"),
        }
    }

    #[test]
    fn test_reading_pair_emitted_when_telemetry_arrives() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);

        // resistance tick alone emits nothing yet
        assert!(processor.process_line(&ride_tick(10, 30)).is_empty());

        let outputs = processor.process_line(&telemetry_tick(10, 84));
        let readings = readings_of(&outputs);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].ride_id, 1);
        assert_eq!(readings[0].resistance, Some(30));
        assert_eq!(readings[0].heart_rate, Some(84));
        // 16:14:10.7 - 16:13:25.9 (start minus calibration offset) = 44s
        assert_eq!(readings[0].elapsed_time, Some(44));
    }

    #[test]
    fn test_back_to_back_resistance_ticks_flush_one_line_pairs() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);

        processor.process_line(&ride_tick(10, 30));
        let outputs = processor.process_line(&ride_tick(11, 31));
        let readings = readings_of(&outputs);

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].resistance, Some(30));
        assert_eq!(readings[0].heart_rate, None);
    }

    #[test]
    fn test_streak_of_dropouts_raises_one_alert() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);

        let mut alerts = Vec::new();
        // hrt = 0 is abnormal for every zone; timestamps are past warm-up
        for i in 0..3 {
            processor.process_line(&ride_tick(40 + i, 30));
            for output in processor.process_line(&telemetry_tick(40 + i, 0)) {
                if let Output::Alert(alert) = output {
                    alerts.push(alert);
                }
            }
        }

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].readings, vec![0, 0, 0]);
        assert_eq!(alerts[0].rider_id, Some(815));
        assert_eq!(alerts[0].email.as_deref(), Some("wayne@example.com"));
        assert_eq!(alerts[0].salutation(), "Mr");
    }

    #[test]
    fn test_normal_reading_breaks_streak() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);

        let mut alerts = 0;
        let heart_rates = [0, 0, 80, 0, 0];
        for (i, hrt) in heart_rates.iter().enumerate() {
            processor.process_line(&ride_tick(40 + i as u32, 30));
            for output in processor.process_line(&telemetry_tick(40 + i as u32, *hrt)) {
                if matches!(output, Output::Alert(_)) {
                    alerts += 1;
                }
            }
        }
        assert_eq!(alerts, 0);
    }

    #[test]
    fn test_new_rider_line_closes_previous_ride() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);
        processor.process_line(&ride_tick(40, 30));
        processor.process_line(&telemetry_tick(40, 0));

        let outputs = processor.process_line(RIDER_LINE);
        // second session: same bike serial resolves to the same bike id,
        // ride id advances
        match &outputs[2] {
            Output::Record(Record::Ride(r)) => assert_eq!(r.bike_id, 1),
            other => panic!("expected ride record, got {other:?}"),
        }

        processor.process_line(&ride_tick(50, 30));
        let readings_out = processor.process_line(&telemetry_tick(50, 84));
        assert_eq!(readings_of(&readings_out)[0].ride_id, 2);
    }

    #[test]
    fn test_orphan_telemetry_and_unknown_lines_are_dropped() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);

        assert!(processor.process_line(&telemetry_tick(40, 84)).is_empty());
        assert!(processor.process_line("--------- noise ---------").is_empty());
        assert!(processor.process_line("").is_empty());
    }

    #[test]
    fn test_finish_flushes_trailing_tick() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);
        processor.process_line(&ride_tick(40, 35));

        let outputs = processor.finish();
        let readings = readings_of(&outputs);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].resistance, Some(35));
    }

    #[test]
    fn test_tracker_state_round_trip() {
        let mut processor = SessionProcessor::new();
        processor.process_line(RIDER_LINE);
        processor.process_line(&ride_tick(40, 30));
        processor.process_line(&telemetry_tick(40, 0));

        let state = processor.save_tracker_state().unwrap();
        let mut restored = SessionProcessor::new();
        restored.load_tracker_state(&state).unwrap();
    }
}
