//! Anomaly streak tracking
//!
//! Single-reading anomaly checks are noisy: sensor glitches produce isolated
//! zeros and spikes. The tracker requires a run of consecutive abnormal
//! readings before raising an alert, and suppresses runs during the ride's
//! warm-up window where startup noise is expected.
//!
//! State is partitioned by (rider, ride) key and owned by whoever holds the
//! tracker: concurrent readings for different rides never contend, while
//! readings for one ride must arrive in order (single writer per key).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// Consecutive abnormal readings required before alerting.
pub const DEFAULT_STREAK_THRESHOLD: usize = 3;

/// Elapsed seconds a ride must exceed before a streak may alert.
pub const DEFAULT_WARMUP_SECS: i64 = 30;

/// Tracker configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Consecutive abnormal readings required to alert.
    pub threshold: usize,
    /// Minimum ride elapsed time (seconds) before a streak may alert.
    pub warmup_secs: i64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STREAK_THRESHOLD,
            warmup_secs: DEFAULT_WARMUP_SECS,
        }
    }
}

/// State key: one active (rider, ride) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RideKey {
    pub rider_id: Option<i64>,
    pub ride_id: i64,
}

/// Per-key streak state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum StreakState {
    Normal,
    /// The heart-rate values of the current run of abnormal readings.
    Watching { readings: Vec<i64> },
}

/// Keyed store of anomaly streaks across active rides.
///
/// The `Alerted` state is transient: when a streak fires, [`observe`]
/// returns the run of abnormal values and the key resets to `Normal`, so a
/// later streak in the same ride can trigger again; there is no permanent silencing.
///
/// [`observe`]: AnomalyStreakTracker::observe
#[derive(Debug, Clone, Default)]
pub struct AnomalyStreakTracker {
    streaks: HashMap<RideKey, StreakState>,
    config: StreakConfig,
}

impl AnomalyStreakTracker {
    pub fn new(config: StreakConfig) -> Self {
        Self {
            streaks: HashMap::new(),
            config,
        }
    }

    /// Feed one reading for the given key.
    ///
    /// Returns the ordered run of abnormal heart-rate values when this
    /// reading completes an alert-worthy streak, `None` otherwise. A normal
    /// reading breaks any streak regardless of prior state. A streak only
    /// fires once the run reaches the configured threshold *and* the ride is
    /// past its warm-up; readings with no elapsed time never fire.
    pub fn observe(
        &mut self,
        key: RideKey,
        heart_rate: i64,
        abnormal: bool,
        elapsed_time: Option<i64>,
    ) -> Option<Vec<i64>> {
        if !abnormal {
            self.streaks.insert(key, StreakState::Normal);
            return None;
        }

        let mut readings = match self.streaks.remove(&key) {
            Some(StreakState::Watching { readings }) => readings,
            _ => Vec::new(),
        };
        readings.push(heart_rate);

        let past_warmup = elapsed_time.is_some_and(|t| t > self.config.warmup_secs);
        if readings.len() >= self.config.threshold && past_warmup {
            self.streaks.insert(key, StreakState::Normal);
            return Some(readings);
        }

        self.streaks.insert(key, StreakState::Watching { readings });
        None
    }

    /// Length of the current abnormal run for a key (0 when normal/unknown).
    pub fn streak_len(&self, key: &RideKey) -> usize {
        match self.streaks.get(key) {
            Some(StreakState::Watching { readings }) => readings.len(),
            _ => 0,
        }
    }

    /// Clear the state for a ride that has ended.
    pub fn end_ride(&mut self, key: &RideKey) {
        self.streaks.remove(key);
    }

    /// Number of keys currently tracked.
    pub fn active_rides(&self) -> usize {
        self.streaks.len()
    }

    /// Serialize tracker state to JSON for persistence across restarts.
    pub fn to_json(&self) -> Result<String, TransformError> {
        let snapshot = Snapshot {
            config: self.config,
            entries: self
                .streaks
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Restore tracker state previously saved with [`to_json`].
    ///
    /// [`to_json`]: AnomalyStreakTracker::to_json
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| TransformError::StateError(e.to_string()))?;
        Ok(Self {
            streaks: snapshot.entries.into_iter().collect(),
            config: snapshot.config,
        })
    }
}

/// JSON shape for persisted state; map keys are structs, so entries are
/// stored as a list.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    config: StreakConfig,
    entries: Vec<(RideKey, StreakState)>,
}
