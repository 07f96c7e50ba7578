//! Validation-report location and the failure index.
//!
//! The upstream service may attach its per-field validation verdict at the
//! payload top level, under several alias keys inside the effective source,
//! or buried arbitrarily deep — including as a JSON-encoded string. The
//! search order here is fixed; the first accepted structure wins and at
//! most one report is live per document.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::model::{EffectiveSource, RawRecord};
use crate::normalize::normalize_key;

/// Reason recorded for a failed field whose report entry carries none.
pub const DEFAULT_FAILURE_REASON: &str = "Failed validation";

/// Alias keys checked at the payload top level. Case-sensitive.
const TOP_LEVEL_ALIASES: [&str; 3] = ["ValidationStatus", "validation", "validationStatus"];

/// Alias keys checked directly on the effective source.
const SOURCE_ALIASES: [&str; 4] = ["ValidationStatus", "validation", "validationStatus", "Validation"];

fn has_failed_fields_list(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get("FailedFields"))
        .map_or(false, Value::is_array)
}

/// Locate the validation report for one document load.
///
/// Search order, stopping at the first success:
/// 1. top-level alias keys of the payload (any object value accepted);
/// 2. alias keys directly on the effective source, accepted only when the
///    value is an object with a list-valued `FailedFields`;
/// 3. recursive depth-first search of the effective source, parsing string
///    members as JSON and recursing into the result. Parse failures are
///    swallowed and treated as no match at that branch.
pub fn locate_validation_report(
    payload_extra: &RawRecord,
    source: &EffectiveSource,
) -> Option<Value> {
    for key in TOP_LEVEL_ALIASES {
        if let Some(value) = payload_extra.get(key) {
            if value.is_object() {
                return Some(value.clone());
            }
        }
    }

    let record = source.record()?;

    for key in SOURCE_ALIASES {
        if let Some(value) = record.get(key) {
            if has_failed_fields_list(value) {
                return Some(value.clone());
            }
        }
    }

    // Last resort: deep search, mirroring the root-object case of
    // `deep_search` without cloning the whole record up front.
    if record.get("FailedFields").map_or(false, Value::is_array) {
        return Some(Value::Object(record.clone()));
    }
    record.values().find_map(search_member)
}

fn deep_search(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) => {
            if map.get("FailedFields").map_or(false, Value::is_array) {
                return Some(value.clone());
            }
            map.values().find_map(search_member)
        }
        Value::Array(items) => items.iter().find_map(search_member),
        _ => None,
    }
}

fn search_member(member: &Value) -> Option<Value> {
    match member {
        Value::Object(_) | Value::Array(_) => deep_search(member),
        // Stringified JSON is common in extracted payloads; a string that
        // fails to parse is simply not a match.
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .and_then(|parsed| deep_search(&parsed)),
        _ => None,
    }
}

/// Normalized lookup form of a validation report: which fields are failing
/// and why. Rebuilt on every document load or explicit refresh, discarded
/// with the session.
#[derive(Debug, Clone, Default)]
pub struct FailureIndex {
    failing: BTreeSet<String>,
    reasons: BTreeMap<String, String>,
}

impl FailureIndex {
    /// Whether `label` (any spelling) is currently failing validation.
    pub fn is_failed(&self, label: &str) -> bool {
        self.failing.contains(&normalize_key(label))
    }

    /// The recorded reason for `label`, if it is failing.
    pub fn reason(&self, label: &str) -> Option<&str> {
        self.reasons.get(&normalize_key(label)).map(String::as_str)
    }

    /// Number of distinct failing fields.
    pub fn len(&self) -> usize {
        self.failing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failing.is_empty()
    }

    /// Normalized identifiers of all failing fields, with reasons.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reasons.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Derive the failure index from a located report.
///
/// Absent report or non-list `FailedFields` yields an empty index. Each
/// entry's identifier comes from the first present scalar among `Field`,
/// `field`, `FieldName`, `name`; the reason from `Reason`, `reason`,
/// `message`, defaulting when blank. Entries whose identifier normalizes
/// to empty are skipped; duplicates are last-write-wins in list order.
pub fn build_failure_index(report: Option<&Value>) -> FailureIndex {
    let mut index = FailureIndex::default();

    let entries = match report
        .and_then(|r| r.get("FailedFields"))
        .and_then(Value::as_array)
    {
        Some(list) => list,
        None => return index,
    };

    for entry in entries {
        let obj = match entry.as_object() {
            Some(o) => o,
            None => continue,
        };

        let field = first_scalar(obj, &["Field", "field", "FieldName", "name"]);
        let normalized = normalize_key(&field);
        if normalized.is_empty() {
            continue;
        }

        let reason = first_scalar(obj, &["Reason", "reason", "message"]);
        let reason = if reason.is_empty() {
            DEFAULT_FAILURE_REASON.to_string()
        } else {
            reason
        };

        index.failing.insert(normalized.clone());
        index.reasons.insert(normalized, reason);
    }

    index
}

/// First present scalar value among `aliases`, rendered as a string.
/// Null and structured values do not count as present.
fn first_scalar(obj: &RawRecord, aliases: &[&str]) -> String {
    for &key in aliases {
        match obj.get(key) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            Some(Value::Bool(b)) => return b.to_string(),
            _ => {}
        }
    }
    String::new()
}
