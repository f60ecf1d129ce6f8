//! Spinlog - transformation engine for exercise-bike telemetry log lines
//!
//! Spinlog recovers typed records from the free-text log feed emitted by
//! exercise-bike hardware and watches each rider's heart rate against
//! physiologically derived safety bounds:
//! line classification → leaf parsing → record building → zone check →
//! anomaly streak tracking → optional alert.
//!
//! ## Modules
//!
//! - **Builders**: turn raw log units into Rider, Address, Ride and Reading
//!   records, absorbing real-world input noise as absent fields
//! - **Zones / Streak**: derive per-rider safe heart-rate bounds and decide
//!   when a run of abnormal readings warrants an alert

pub mod alert;
pub mod builders;
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod streak;
pub mod types;
pub mod zones;

pub use alert::{AlertDispatcher, HeartRateAlert};
pub use error::TransformError;
pub use pipeline::{Output, SessionProcessor};

// Record exports
pub use types::{AddressRecord, Gender, Record, ReadingRecord, RideRecord, RiderRecord};

// Heart-rate engine exports
pub use streak::{AnomalyStreakTracker, RideKey, StreakConfig};
pub use zones::{safe_zone, HeartRateZone};

/// Spinlog version embedded in CLI output
pub const SPINLOG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for emitted payloads
pub const PRODUCER_NAME: &str = "spinlog";
