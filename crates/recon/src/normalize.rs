//! Key-equality rules.
//!
//! Two field labels refer to the same field if and only if `normalize_key`
//! maps them to identical output. No other fuzzy matching exists anywhere
//! in the engine.

use crate::model::RawRecord;

/// Lowercase the input and drop every character that is not an ASCII
/// letter or digit. Idempotent.
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Literal spelling variants of a canonical label: the label itself, the
/// label minus whitespace and hyphens, the label with `-`/`_` turned into
/// spaces, and the lowercase form. Widens the search before normalization
/// so alternate separator conventions ("E-Way Bill NO", "EWayBillNo")
/// still meet at the same normalized key.
pub fn variants_for(canonical: &str) -> Vec<String> {
    let candidates = [
        canonical.to_string(),
        canonical
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect(),
        canonical.replace(['-', '_'], " "),
        canonical.to_lowercase(),
    ];

    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for v in candidates {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// Find the first key of `source` (in record order) whose normalized form
/// matches any normalized variant of `canonical`. Returns `None` when the
/// source is absent or nothing matches — distinct from a key that maps to
/// an empty value.
pub fn find_key_in_source<'a>(source: Option<&'a RawRecord>, canonical: &str) -> Option<&'a str> {
    let source = source?;
    let candidates: Vec<String> = variants_for(canonical)
        .iter()
        .map(|v| normalize_key(v))
        .collect();

    source
        .keys()
        .find(|key| candidates.contains(&normalize_key(key)))
        .map(String::as_str)
}
