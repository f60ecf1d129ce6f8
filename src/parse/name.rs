//! Display-name splitting
//!
//! Rider hardware reports a single free-text display name. Storage wants
//! first/last components with honorifics stripped.

/// Honorific prefixes dropped from the front of a name, matched
/// case-insensitively with or without a trailing period.
const HONORIFICS: [&str; 5] = ["mr", "mrs", "miss", "ms", "dr"];

/// Split a free-text display name into (first_name, last_name).
///
/// The last whitespace-delimited token becomes the last name; everything
/// before it is kept as one string, so multi-token first/middle names
/// survive intact. A single remaining token yields identical first and last
/// name, a known simplification kept deliberately.
pub fn split_name(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(raw) = raw else {
        return (None, None);
    };

    let mut tokens: Vec<&str> = raw.split_whitespace().collect();

    if tokens
        .first()
        .is_some_and(|t| HONORIFICS.contains(&t.trim_end_matches('.').to_lowercase().as_str()))
    {
        tokens.remove(0);
    }

    match tokens.as_slice() {
        [] => (None, None),
        [only] => (Some(only.to_string()), Some(only.to_string())),
        [firsts @ .., last] => (Some(firsts.join(" ")), Some(last.to_string())),
    }
}
