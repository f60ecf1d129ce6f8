//! Postal-address splitting
//!
//! Addresses arrive as one comma-separated string with no guaranteed line
//! count. Splitting is positional by rule, with every short shape handled by
//! an explicit fallback branch instead of index arithmetic:
//!
//! - absent / 0 segments: all fields absent
//! - 1 segment: first_line only
//! - 2 segments: first_line and city coincide, last segment is the postcode
//! - 3 segments: first_line, city, postcode
//! - exactly 4: the second segment is second_line
//! - 5+: first_line plus the last two as city/postcode; the middle is dropped
//!
//! No postcode-format validation happens here.

use crate::types::AddressRecord;

/// Split a free-text address string into structured fields.
pub fn parse_address(raw: Option<&str>) -> AddressRecord {
    let segments: Vec<&str> = match raw {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    };

    match segments.as_slice() {
        [] => AddressRecord::default(),
        [only] => AddressRecord {
            first_line: Some(only.to_string()),
            ..Default::default()
        },
        [first, postcode] => AddressRecord {
            first_line: Some(first.to_string()),
            second_line: None,
            city: Some(first.to_string()),
            postcode: Some(postcode.to_string()),
        },
        [first, second, city, postcode] => AddressRecord {
            first_line: Some(first.to_string()),
            second_line: Some(second.to_string()),
            city: Some(city.to_string()),
            postcode: Some(postcode.to_string()),
        },
        [first, .., city, postcode] => AddressRecord {
            first_line: Some(first.to_string()),
            second_line: None,
            city: Some(city.to_string()),
            postcode: Some(postcode.to_string()),
        },
    }
}
