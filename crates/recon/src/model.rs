use serde_json::{Map, Value};

use crate::normalize::normalize_key;

/// Free-form key/value data from the extraction pipeline. Keys may differ
/// from canonical spelling by case, punctuation, or spacing.
///
/// Backed by `serde_json::Map` with `preserve_order`, so key order is the
/// order keys appeared in the payload — `find_key_in_source` relies on it
/// for first-match semantics.
pub type RawRecord = Map<String, Value>;

/// Canonical-field-keyed view of the best-available raw record for one
/// document. Keys appear in `CANONICAL_FIELDS` order; fields with no match
/// in the source are absent, never present-with-null.
pub type ReconciledRecord = Map<String, Value>;

/// Fixed display order for the review form. Defines both iteration order
/// and the keys a consumer of a reconciled record can rely on.
pub const CANONICAL_FIELDS: [&str; 19] = [
    "Branch",
    "Date",
    "ConsignmentNo",
    "Source",
    "Destination",
    "Vehicle",
    "EWayBillNo",
    "Consignor",
    "Consignee",
    "GSTType",
    "Delivery Address",
    "Invoice No",
    "ContentName",
    "ActualWeight",
    "E-WayBill ValidUpto",
    "Invoice Date",
    "E-Way Bill Date",
    "Get Rate",
    "GoodsType",
];

/// Resolve any spelling of a field label to its canonical form, using the
/// engine's single equality rule (`normalize_key`).
pub fn canonical_for(label: &str) -> Option<&'static str> {
    let n = normalize_key(label);
    if n.is_empty() {
        return None;
    }
    CANONICAL_FIELDS.iter().find(|f| normalize_key(f) == n).copied()
}

/// Which raw record was selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Corrected,
    Extracted,
    Empty,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corrected => write!(f, "corrected"),
            Self::Extracted => write!(f, "extracted"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// The record chosen for display: corrected if non-empty, else extracted.
/// Selection is total; fields are never merged across sources.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveSource<'a> {
    pub kind: SourceKind,
    pub(crate) record: Option<&'a RawRecord>,
}

impl<'a> EffectiveSource<'a> {
    pub fn record(&self) -> Option<&'a RawRecord> {
        self.record
    }
}
