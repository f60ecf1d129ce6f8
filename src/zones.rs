//! Safe heart-rate zones
//!
//! Derives per-rider [min, max] heart-rate bounds from age and gender.
//!
//! Maximum heart rate uses three published formulas:
//! - Gulati (women): 206 − 0.88 × age
//! - Fox (men under 40): 220 − age
//! - Tanaka (men 40 and over): 208 − 0.7 × age
//!
//! The minimum is a resting-rate floor at the lower end of an athlete's
//! range, bracketed by age. Riders with `Other` or unknown gender take the
//! Gulati/female values throughout, the conservative choice.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Gender;

/// Safe heart-rate bounds for one rider. A reading outside `[min_bpm,
/// max_bpm]`, or a zero reading (sensor dropout), is abnormal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateZone {
    pub min_bpm: i64,
    pub max_bpm: i64,
}

impl HeartRateZone {
    pub fn is_abnormal(&self, heart_rate: i64) -> bool {
        heart_rate == 0 || heart_rate < self.min_bpm || heart_rate > self.max_bpm
    }
}

/// Age in whole years on the given date, corrected for whether the birthday
/// has occurred yet that year.
pub fn age_on(birthdate: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birthdate.year();
    if (on.month(), on.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

/// Age in whole years today.
pub fn current_age(birthdate: NaiveDate) -> i32 {
    age_on(birthdate, Utc::now().date_naive())
}

/// Compute the safe heart-rate zone for a rider of the given age and gender.
pub fn safe_zone(age: i32, gender: Option<Gender>) -> HeartRateZone {
    HeartRateZone {
        min_bpm: min_heart_rate(age, gender),
        max_bpm: max_heart_rate(age, gender),
    }
}

fn max_heart_rate(age: i32, gender: Option<Gender>) -> i64 {
    let age = f64::from(age);
    match gender {
        Some(Gender::Male) if age < 40.0 => (220.0 - age).round() as i64,
        Some(Gender::Male) => (208.0 - 0.7 * age).round() as i64,
        // female, other, unknown: conservative Gulati
        _ => (206.0 - 0.88 * age).round() as i64,
    }
}

fn min_heart_rate(age: i32, gender: Option<Gender>) -> i64 {
    match gender {
        Some(Gender::Male) => match age {
            18..=39 => 40,
            40..=64 => 47,
            _ => 52,
        },
        _ => match age {
            18..=39 => 45,
            40..=64 => 52,
            _ => 57,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_age_before_and_after_birthday() {
        let birthdate = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let before = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let on_day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let after = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();

        assert_eq!(age_on(birthdate, before), 33);
        assert_eq!(age_on(birthdate, on_day), 34);
        assert_eq!(age_on(birthdate, after), 34);
    }

    #[test]
    fn test_male_over_forty_uses_tanaka() {
        let zone = safe_zone(45, Some(Gender::Male));
        // round(208 - 0.7 * 45) = round(176.5) = 177
        assert_eq!(zone.max_bpm, 177);
        assert_eq!(zone.min_bpm, 47);
    }

    #[test]
    fn test_male_under_forty_uses_fox() {
        let zone = safe_zone(30, Some(Gender::Male));
        assert_eq!(zone.max_bpm, 190);
        assert_eq!(zone.min_bpm, 40);
    }

    #[test]
    fn test_female_uses_gulati() {
        let zone = safe_zone(30, Some(Gender::Female));
        // round(206 - 0.88 * 30) = round(179.6) = 180
        assert_eq!(zone.max_bpm, 180);
        assert_eq!(zone.min_bpm, 45);
    }

    #[test]
    fn test_other_and_unknown_gender_take_conservative_formula() {
        let female = safe_zone(50, Some(Gender::Female));
        assert_eq!(safe_zone(50, Some(Gender::Other)), female);
        assert_eq!(safe_zone(50, None), female);
        assert_eq!(female.min_bpm, 52);
    }

    #[test]
    fn test_senior_bracket() {
        assert_eq!(safe_zone(70, Some(Gender::Male)).min_bpm, 52);
        assert_eq!(safe_zone(70, Some(Gender::Female)).min_bpm, 57);
    }

    #[test]
    fn test_abnormal_classification() {
        let zone = HeartRateZone { min_bpm: 47, max_bpm: 177 };
        assert!(zone.is_abnormal(0)); // sensor dropout
        assert!(zone.is_abnormal(46));
        assert!(zone.is_abnormal(178));
        assert!(!zone.is_abnormal(47));
        assert!(!zone.is_abnormal(177));
        assert!(!zone.is_abnormal(80));
    }
}
