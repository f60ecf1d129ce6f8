//! Semicolon-delimited key=value lines
//!
//! Reading lines carry their payload inline rather than in a mapping:
//!
//! ```text
//! 2022-07-25 16:13:36.709 mendoza v9: [INFO]: Ride - duration = 500; resistance = 30
//! 2022-07-25 16:13:37.209 mendoza v9: [INFO]: Telemetry - hrt = 84; rpm = 27; power = 5.0924
//! ```
//!
//! Each `;` segment is one entry. The key is the last whitespace-separated
//! token before the `=`, which names fields explicitly instead of relying on
//! segment position, so reordered or missing entries degrade to absent fields
//! rather than mis-assigned ones. Segments without a `=` are skipped.

use std::collections::HashMap;

/// Parse one reading line into its named entries. Values are trimmed but not
/// typed; callers parse per key. Never errors.
pub fn parse_kv_line(line: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();

    for segment in line.split(';') {
        let Some((head, value)) = segment.split_once('=') else {
            continue;
        };
        let Some(key) = head.split_whitespace().last() else {
            continue;
        };
        entries.insert(key.to_string(), value.trim().to_string());
    }

    entries
}
