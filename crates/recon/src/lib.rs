//! `docdesk-recon` — field reconciliation engine for document review.
//!
//! Pure engine crate: receives pre-parsed payload records, produces the
//! canonical display record and the validation failure index for one
//! document. No network or IO dependencies.

pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod session;
pub mod validation;

pub use error::ReconError;
pub use model::{
    canonical_for, EffectiveSource, RawRecord, ReconciledRecord, SourceKind, CANONICAL_FIELDS,
};
pub use normalize::{find_key_in_source, normalize_key, variants_for};
pub use reconcile::{build_reconciled_record, select_effective_source};
pub use session::{RefreshOutcome, ReviewSession};
pub use validation::{
    build_failure_index, locate_validation_report, FailureIndex, DEFAULT_FAILURE_REASON,
};
