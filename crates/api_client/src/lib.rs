//! Document-processing backend client — shared between CLI and any future
//! desktop frontend.
//!
//! This crate is the single source of truth for the backend wire contract:
//! login, dashboard summary, monitoring, review queue, review payload,
//! corrected-data save, uploads. Payloads are parsed into typed entities
//! once, here, at the network boundary; nothing downstream re-derives
//! shapes ad hoc.
//!
//! No GUI concepts. No retries. No progress bars.

mod client;
mod session;

pub use client::{
    ApiClient, ApiError, ClientInfo, DashboardSummary, DocFormat, DocInfo, DocSummary,
    ListFilters, RecentUpload, ReviewDocument, SummaryCounts, TrendPoint, UploadReceipt,
    UploadedFile, UserInfo,
};
pub use session::{
    delete_session, load_session, save_session, session_file_path, StoredSession,
    SESSION_TTL_HOURS,
};
