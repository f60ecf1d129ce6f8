//! Rider identity and address builders
//!
//! A rider-info line embeds one mapping with the rider's account payload:
//! `user_id`, `name`, `gender`, `address`, `date_of_birth` and
//! `account_create_date` (both epoch milliseconds), `email_address`,
//! `height_cm`, `weight_kg`, `bike_serial`.

use chrono::{DateTime, NaiveDate};

use crate::parse::{parse_address, parse_embedded_mapping, split_name};
use crate::types::{AddressRecord, Gender, RiderRecord};

/// Build a rider record from one rider-info log line.
pub fn rider_from_log_line(line: &str) -> RiderRecord {
    let payload = parse_embedded_mapping(line);

    let name = payload.get("name").and_then(|v| v.as_str());
    let (first_name, last_name) = split_name(name);

    RiderRecord {
        id: payload.get("user_id").and_then(|v| v.as_i64()),
        first_name,
        last_name,
        birthdate: payload
            .get("date_of_birth")
            .and_then(|v| v.as_i64())
            .and_then(epoch_ms_to_date),
        height_cm: payload.get("height_cm").and_then(|v| v.as_i64()),
        weight_kg: payload.get("weight_kg").and_then(|v| v.as_i64()),
        email: payload
            .get("email_address")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        gender: Gender::from_raw(payload.get("gender").and_then(|v| v.as_str())),
        account_created: payload
            .get("account_create_date")
            .and_then(|v| v.as_i64())
            .and_then(epoch_ms_to_date),
    }
}

/// Build an address record from the same rider-info log line.
///
/// The address is an independent structure; the caller associates it with
/// the rider that produced it.
pub fn address_from_log_line(line: &str) -> AddressRecord {
    let payload = parse_embedded_mapping(line);
    parse_address(payload.get("address").and_then(|v| v.as_str()))
}

/// Extract the bike serial number from a rider-info log line, if present.
pub fn bike_serial_from_log_line(line: &str) -> Option<String> {
    parse_embedded_mapping(line)
        .get("bike_serial")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Extract the rider's email address from a rider-info log line, if present.
pub fn email_from_log_line(line: &str) -> Option<String> {
    parse_embedded_mapping(line)
        .get("email_address")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Epoch milliseconds to a calendar date. Out-of-range values are absent.
fn epoch_ms_to_date(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RIDER_LINE: &str = "2022-07-25 16:13:26.426084 mendoza v9: [SYSTEM] data = \
        {'user_id': 815, 'name': 'Mr Wayne Fitzgerald', 'gender': 'male', \
        'address': '64 Winter Lane, Old Town, York, YO49 4HU', \
        'date_of_birth': -199584000000, 'email_address': 'wayne_fitzgerald@hotmail.com', \
        'height_cm': 187, 'weight_kg': 52, 'account_create_date': 1641254400000, \
        'bike_serial': 'T8169', 'original_source': 'offline'}";

    #[test]
    fn test_rider_from_full_line() {
        let rider = rider_from_log_line(RIDER_LINE);

        assert_eq!(rider.id, Some(815));
        assert_eq!(rider.first_name.as_deref(), Some("Wayne"));
        assert_eq!(rider.last_name.as_deref(), Some("Fitzgerald"));
        // -199584000000 ms = 1963-09-05
        assert_eq!(
            rider.birthdate,
            NaiveDate::from_ymd_opt(1963, 9, 5)
        );
        assert_eq!(rider.height_cm, Some(187));
        assert_eq!(rider.weight_kg, Some(52));
        assert_eq!(
            rider.email.as_deref(),
            Some("wayne_fitzgerald@hotmail.com")
        );
        assert_eq!(rider.gender, Some(Gender::Male));
        assert_eq!(
            rider.account_created,
            NaiveDate::from_ymd_opt(2022, 1, 4)
        );
    }

    #[test]
    fn test_address_from_same_line() {
        let addr = address_from_log_line(RIDER_LINE);
        assert_eq!(addr.first_line.as_deref(), Some("64 Winter Lane"));
        assert_eq!(addr.second_line.as_deref(), Some("Old Town"));
        assert_eq!(addr.city.as_deref(), Some("York"));
        assert_eq!(addr.postcode.as_deref(), Some("YO49 4HU"));
    }

    #[test]
    fn test_missing_fields_are_absent_not_defaulted() {
        let rider = rider_from_log_line("t v9: [SYSTEM] data = {'user_id': 4}");

        assert_eq!(rider.id, Some(4));
        assert_eq!(rider.first_name, None);
        assert_eq!(rider.last_name, None);
        assert_eq!(rider.birthdate, None);
        assert_eq!(rider.height_cm, None);
        assert_eq!(rider.weight_kg, None);
        assert_eq!(rider.email, None);
        assert_eq!(rider.gender, None);
        assert_eq!(rider.account_created, None);
    }

    #[test]
    fn test_no_mapping_yields_all_absent_record() {
        let rider = rider_from_log_line("completely malformed line");
        assert_eq!(rider.id, None);
        assert_eq!(rider.gender, None);
    }

    #[test]
    fn test_no_address_field_yields_empty_address() {
        let addr = address_from_log_line("t v9: [SYSTEM] data = {'user_id': 4}");
        assert!(addr.is_empty());
    }

    #[test]
    fn test_bike_serial_and_email_helpers() {
        assert_eq!(
            bike_serial_from_log_line(RIDER_LINE).as_deref(),
            Some("T8169")
        );
        assert_eq!(
            email_from_log_line(RIDER_LINE).as_deref(),
            Some("wayne_fitzgerald@hotmail.com")
        );
        assert_eq!(bike_serial_from_log_line("no payload"), None);
    }

    #[test]
    fn test_idempotent_rebuild() {
        assert_eq!(rider_from_log_line(RIDER_LINE), rider_from_log_line(RIDER_LINE));
    }
}
