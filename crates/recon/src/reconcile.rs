//! Source selection and reconciled-record construction.

use crate::model::{EffectiveSource, RawRecord, ReconciledRecord, SourceKind};
use crate::normalize::find_key_in_source;

/// Choose the record to display: `corrected` if it has at least one key,
/// otherwise `extracted`, otherwise an empty source. The choice is total —
/// fields are never combined from both records.
pub fn select_effective_source<'a>(
    corrected: Option<&'a RawRecord>,
    extracted: Option<&'a RawRecord>,
) -> EffectiveSource<'a> {
    match corrected {
        Some(c) if !c.is_empty() => EffectiveSource {
            kind: SourceKind::Corrected,
            record: Some(c),
        },
        _ => match extracted {
            Some(e) => EffectiveSource {
                kind: SourceKind::Extracted,
                record: Some(e),
            },
            None => EffectiveSource {
                kind: SourceKind::Empty,
                record: None,
            },
        },
    }
}

/// Build the canonical-field-keyed record from the effective source.
///
/// Fields are resolved in the fixed list order; a field with no match in
/// the source is omitted entirely. The output never contains a key outside
/// `fields` and never reorders relative to it.
pub fn build_reconciled_record(source: &EffectiveSource, fields: &[&str]) -> ReconciledRecord {
    let mut out = ReconciledRecord::new();
    let record = source.record();

    for &field in fields {
        if let Some(key) = find_key_in_source(record, field) {
            if let Some(value) = record.and_then(|r| r.get(key)) {
                out.insert(field.to_string(), value.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CANONICAL_FIELDS;
    use serde_json::json;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn corrected_wins_when_non_empty() {
        let corrected = record(&[("a", "1")]);
        let extracted = record(&[("b", "2"), ("c", "3")]);
        let source = select_effective_source(Some(&corrected), Some(&extracted));
        assert_eq!(source.kind, SourceKind::Corrected);
        assert_eq!(source.record().unwrap().len(), 1);
    }

    #[test]
    fn empty_corrected_falls_back_to_extracted() {
        let corrected = RawRecord::new();
        let extracted = record(&[("b", "2")]);
        let source = select_effective_source(Some(&corrected), Some(&extracted));
        assert_eq!(source.kind, SourceKind::Extracted);
        assert!(source.record().unwrap().contains_key("b"));
    }

    #[test]
    fn both_absent_yields_empty_source() {
        let source = select_effective_source(None, None);
        assert_eq!(source.kind, SourceKind::Empty);
        assert!(source.record().is_none());
    }

    #[test]
    fn reconciled_record_uses_canonical_names_and_order() {
        // Keys arrive in scrambled order and variant spellings.
        let extracted = record(&[
            ("goods type", "Electronics"),
            ("E Way Bill No", "EWB-991"),
            ("branch", "Pune"),
        ]);
        let source = select_effective_source(None, Some(&extracted));
        let rec = build_reconciled_record(&source, &CANONICAL_FIELDS);

        let keys: Vec<&str> = rec.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Branch", "EWayBillNo", "GoodsType"]);
        assert_eq!(rec["EWayBillNo"], json!("EWB-991"));
    }

    #[test]
    fn unmatched_fields_are_omitted_not_null() {
        let extracted = record(&[("Branch", "Pune")]);
        let source = select_effective_source(None, Some(&extracted));
        let rec = build_reconciled_record(&source, &CANONICAL_FIELDS);
        assert_eq!(rec.len(), 1);
        assert!(!rec.contains_key("Date"));
    }

    #[test]
    fn never_introduces_non_canonical_keys() {
        let extracted = record(&[("Branch", "Pune"), ("mystery_column", "??")]);
        let source = select_effective_source(None, Some(&extracted));
        let rec = build_reconciled_record(&source, &CANONICAL_FIELDS);
        for key in rec.keys() {
            assert!(CANONICAL_FIELDS.contains(&key.as_str()), "unexpected key {key}");
        }
    }

    #[test]
    fn empty_source_yields_empty_record() {
        let source = select_effective_source(None, None);
        let rec = build_reconciled_record(&source, &CANONICAL_FIELDS);
        assert!(rec.is_empty());
    }

    #[test]
    fn values_are_copied_verbatim() {
        let mut extracted = RawRecord::new();
        extracted.insert("ActualWeight".into(), json!(142.5));
        extracted.insert("Get Rate".into(), json!(null));
        let source = select_effective_source(None, Some(&extracted));
        let rec = build_reconciled_record(&source, &CANONICAL_FIELDS);
        assert_eq!(rec["ActualWeight"], json!(142.5));
        // A present key with a null value is still a match; only a missing
        // key is omitted.
        assert_eq!(rec["Get Rate"], json!(null));
    }
}
