//! Core types for the spinlog transformation layer
//!
//! This module defines the typed records recovered from raw telemetry log
//! units. Every field that the source text may omit is an `Option`: an absent
//! field means the text did not carry it, never a fabricated default.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Rider gender, a closed set.
///
/// Any free text other than "male"/"female" (case-insensitive) maps to
/// `Other`; missing text maps to no gender at all (`Option::None` on the
/// record). The heart-rate formulas group `Other` and absent gender with
/// `Female` as the conservative choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Map free text onto the closed set. Empty or missing text is `None`.
    pub fn from_raw(raw: Option<&str>) -> Option<Gender> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => Some(Gender::Other),
        }
    }
}

/// A rider identity recovered from one rider-info log unit.
///
/// `id` is the externally supplied user identifier, not generated here; the
/// persistence collaborator owns surrogate keys and linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_created: Option<NaiveDate>,
}

/// A postal address recovered from a rider-info log unit.
///
/// The parser treats this as an independent structure keyed by nothing;
/// the caller associates it with the rider that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

impl AddressRecord {
    /// True when no field at all was recovered.
    pub fn is_empty(&self) -> bool {
        self.first_line.is_none()
            && self.second_line.is_none()
            && self.city.is_none()
            && self.postcode.is_none()
    }
}

/// A ride session recovered from one ride-start log unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_id: Option<i64>,
    pub bike_id: i64,
    /// Log timestamp minus the fixed half-second calibration offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

/// One telemetry tick recovered from a reading line pair.
///
/// `resistance` and `elapsed_time` come from the first line of the pair;
/// `heart_rate`, `power` and `rpm` from the second, when present. A
/// one-line-only pair is a normal shape (resistance-only tick).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub ride_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpm: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<i64>,
    /// Whole seconds since the ride's start_time; absent when the reading
    /// timestamp is unparseable or not strictly after start_time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<i64>,
}

/// Envelope handed to the persistence collaborator: one typed record per
/// successful build call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record_type", rename_all = "snake_case")]
pub enum Record {
    Rider(RiderRecord),
    Address(AddressRecord),
    Ride(RideRecord),
    Reading(ReadingRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_raw_closed_set() {
        assert_eq!(Gender::from_raw(Some("Male")), Some(Gender::Male));
        assert_eq!(Gender::from_raw(Some("FEMALE")), Some(Gender::Female));
        assert_eq!(Gender::from_raw(Some("nonbinary")), Some(Gender::Other));
        assert_eq!(Gender::from_raw(Some("")), None);
        assert_eq!(Gender::from_raw(None), None);
    }

    #[test]
    fn test_absent_fields_skipped_in_json() {
        let reading = ReadingRecord {
            ride_id: 7,
            heart_rate: None,
            power: None,
            rpm: None,
            resistance: Some(30),
            elapsed_time: Some(12),
        };

        let json = serde_json::to_string(&Record::Reading(reading)).unwrap();
        assert!(json.contains("\"record_type\":\"reading\""));
        assert!(json.contains("\"resistance\":30"));
        assert!(!json.contains("heart_rate"));
    }

    #[test]
    fn test_address_is_empty() {
        assert!(AddressRecord::default().is_empty());
        let addr = AddressRecord {
            city: Some("London".to_string()),
            ..Default::default()
        };
        assert!(!addr.is_empty());
    }
}
