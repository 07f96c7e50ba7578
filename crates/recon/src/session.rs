//! One document-review session.
//!
//! Owns the reconciled record being edited, the validation report as it
//! was found at load time, and the failure index derived from it. All
//! state is scoped to viewing one document; loading a different document
//! means building a fresh session.

use serde_json::Value;

use crate::error::ReconError;
use crate::model::{canonical_for, RawRecord, ReconciledRecord, SourceKind, CANONICAL_FIELDS};
use crate::reconcile::{build_reconciled_record, select_effective_source};
use crate::validation::{build_failure_index, locate_validation_report, FailureIndex};

/// Result of an explicit failure-index refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Index rebuilt; carries the number of failing fields.
    Refreshed(usize),
    /// No validation report was ever found for this document.
    NothingToRefresh,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    kind: SourceKind,
    record: ReconciledRecord,
    report: Option<Value>,
    index: FailureIndex,
}

impl ReviewSession {
    /// Build a session from the parsed payload pieces: the two candidate
    /// raw records and the remaining top-level payload members (where a
    /// top-level validation report may live).
    pub fn from_parts(
        corrected: Option<&RawRecord>,
        extracted: Option<&RawRecord>,
        payload_extra: &RawRecord,
    ) -> Self {
        let source = select_effective_source(corrected, extracted);
        let record = build_reconciled_record(&source, &CANONICAL_FIELDS);
        let report = locate_validation_report(payload_extra, &source);
        let index = build_failure_index(report.as_ref());

        Self {
            kind: source.kind,
            record,
            report,
            index,
        }
    }

    /// Which raw record the display is based on.
    pub fn source_kind(&self) -> SourceKind {
        self.kind
    }

    /// The record as currently edited, canonical-keyed and canonical-ordered.
    pub fn record(&self) -> &ReconciledRecord {
        &self.record
    }

    pub fn failure_index(&self) -> &FailureIndex {
        &self.index
    }

    /// Read the current value for a field label (any spelling).
    pub fn value(&self, label: &str) -> Option<&Value> {
        let canonical = canonical_for(label)?;
        self.record.get(canonical)
    }

    /// Replace the value under a canonical field, resolving the label via
    /// the engine's normalization rule. The failure index is deliberately
    /// left untouched: a corrected value stays flagged until an explicit
    /// refresh or reload.
    pub fn apply_edit(&mut self, label: &str, value: Value) -> Result<(), ReconError> {
        let canonical =
            canonical_for(label).ok_or_else(|| ReconError::UnknownField(label.to_string()))?;

        if self.record.contains_key(canonical) {
            self.record.insert(canonical.to_string(), value);
            return Ok(());
        }

        // New field: rebuild so canonical order is preserved.
        let mut next = ReconciledRecord::new();
        for &field in CANONICAL_FIELDS.iter() {
            if field == canonical {
                next.insert(field.to_string(), value.clone());
            } else if let Some(existing) = self.record.get(field) {
                next.insert(field.to_string(), existing.clone());
            }
        }
        self.record = next;
        Ok(())
    }

    /// Re-derive the failure index from the report held since load. Does
    /// not contact the network and cannot discover new failures; it exists
    /// so a consumer can re-render highlights without a round trip.
    pub fn refresh_failure_index(&mut self) -> RefreshOutcome {
        match &self.report {
            None => RefreshOutcome::NothingToRefresh,
            Some(report) => {
                self.index = build_failure_index(Some(report));
                RefreshOutcome::Refreshed(self.index.len())
            }
        }
    }
}
