//! Leaf parsers for raw telemetry text
//!
//! These are pure functions over loosely-formatted input. They recover what
//! they can and report everything else as absent; no parser in this module
//! returns an error for malformed text.

mod address;
mod datetime;
mod kv;
mod mapping;
mod name;

pub use address::parse_address;
pub use datetime::extract_datetime;
pub use kv::parse_kv_line;
pub use mapping::{parse_embedded_mapping, LiteralValue};
pub use name::split_name;
