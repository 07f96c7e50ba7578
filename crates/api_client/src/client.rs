//! Blocking HTTP client for the document-processing backend.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers the full
//! dashboard surface: login, summary, monitoring, review queue, clients,
//! document formats, upload, and the review/fix flow (fetch payload, save
//! corrected data).

use std::path::Path;
use std::time::Duration;

use serde_json::Value;

use docdesk_recon::{RawRecord, ReconciledRecord, ReviewSession};

use crate::session::load_session;

/// Backend API client (blocking).
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

/// Error type for backend operations.
#[derive(Debug)]
pub enum ApiError {
    /// No live session saved locally
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing / unexpected payload shape
    Parse(String),
    /// File I/O error
    Io(String),
    /// Server rejected the request (4xx with message)
    Validation(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotAuthenticated => write!(f, "Not logged in"),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Io(msg) => write!(f, "I/O error: {}", msg),
            ApiError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// ── Wire types ──────────────────────────────────────────────────────

/// Logged-in user, from `POST /api/login`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
}

/// One row of a list screen (monitoring or review queue).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DocSummary {
    pub id: i64,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub uploaded_on: Option<String>,
    #[serde(default)]
    pub overall_status: Option<String>,
    #[serde(default)]
    pub data_extraction_status: Option<String>,
    #[serde(default)]
    pub erp_entry_status: Option<String>,
}

/// Client (customer) record.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClientInfo {
    pub id: i64,
    pub name: String,
}

/// Document format configured for a client.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DocFormat {
    pub id: i64,
    #[serde(default)]
    pub doc_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub file_type: Option<String>,
}

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SummaryCounts {
    pub total_docs: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub failed: u64,
    pub human_review: u64,
}

/// Documents-per-day trend point.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    pub date: String,
    pub documents: u64,
}

/// Recent upload row on the dashboard.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecentUpload {
    pub client: Option<String>,
    pub doc_type: Option<String>,
    pub file_name: Option<String>,
    pub uploaded_on: Option<String>,
    pub status: Option<String>,
}

/// Full dashboard summary. Served at the envelope top level, not under
/// `data`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub summary: SummaryCounts,
    pub trend: Vec<TrendPoint>,
    pub recent: Vec<RecentUpload>,
}

/// Upload receipt for one saved file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadedFile {
    pub file_name: String,
    #[serde(default)]
    pub saved_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub message: String,
    pub files: Vec<UploadedFile>,
}

/// Document header shown on the review screen. Every field is optional:
/// older backend rows carry only a subset.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DocInfo {
    pub id: Option<i64>,
    pub client_name: Option<String>,
    pub doc_type: Option<String>,
    pub uploaded_on: Option<String>,
    pub data_extraction_status: Option<String>,
    pub erp_entry_status: Option<String>,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
}

impl DocInfo {
    fn from_value(value: &Value) -> Self {
        let get = |key: &str| value.get(key);
        let text = |key: &str| get(key).and_then(Value::as_str).map(String::from);
        Self {
            id: get("id").and_then(Value::as_i64),
            client_name: text("client_name"),
            doc_type: text("doc_type"),
            uploaded_on: text("uploaded_on"),
            data_extraction_status: text("data_extraction_status"),
            erp_entry_status: text("erp_entry_status"),
            file_name: text("file_name"),
            file_url: text("file_url"),
        }
    }
}

/// The review payload for one document, parsed once at the boundary.
///
/// `payload_extra` holds every top-level member that is not one of the
/// record keys, so the engine's top-level validation search sees exactly
/// what the server sent.
#[derive(Debug, Clone)]
pub struct ReviewDocument {
    pub doc: DocInfo,
    pub extracted: RawRecord,
    pub corrected: RawRecord,
    pub payload_extra: RawRecord,
}

impl ReviewDocument {
    /// Parse the inner payload object of `GET /api/human_review/{id}`.
    pub fn from_payload(payload: Value) -> Result<Self, ApiError> {
        let mut map = match payload {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::Parse(format!(
                    "document payload is not an object (got {})",
                    type_name(&other)
                )))
            }
        };

        // Header block; falls back to the payload root when absent.
        let doc = match map.get("doc") {
            Some(value @ Value::Object(_)) => DocInfo::from_value(value),
            _ => DocInfo::from_value(&Value::Object(map.clone())),
        };
        map.remove("doc");

        let extracted = take_record(&mut map, "extracted_data")
            .or_else(|| take_record(&mut map, "raw_extracted"))
            .unwrap_or_default();
        // raw_extracted is a debugging duplicate; never part of the search space.
        map.remove("raw_extracted");
        let corrected = take_record(&mut map, "corrected_data").unwrap_or_default();

        Ok(Self {
            doc,
            extracted,
            corrected,
            payload_extra: map,
        })
    }

    /// Start a review session over this payload.
    pub fn session(&self) -> ReviewSession {
        ReviewSession::from_parts(
            Some(&self.corrected),
            Some(&self.extracted),
            &self.payload_extra,
        )
    }
}

fn take_record(map: &mut RawRecord, key: &str) -> Option<RawRecord> {
    match map.remove(key) {
        Some(Value::Object(record)) => Some(record),
        // Non-record shapes (null, strings) are treated as absent.
        Some(_) | None => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Query-string filters shared by the list endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub client_id: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub status: Option<String>,
}

impl ListFilters {
    fn query(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(ref v) = self.client_id {
            params.push(("client_id", v.as_str()));
        }
        if let Some(ref v) = self.from_date {
            params.push(("from_date", v.as_str()));
        }
        if let Some(ref v) = self.to_date {
            params.push(("to_date", v.as_str()));
        }
        if let Some(ref v) = self.status {
            params.push(("status", v.as_str()));
        }
        params
    }
}

// ── Client ──────────────────────────────────────────────────────────

impl ApiClient {
    /// Create a client using the saved login session's API base.
    pub fn from_saved_session() -> Result<Self, ApiError> {
        let session = load_session().ok_or(ApiError::NotAuthenticated)?;
        Ok(Self::new(session.api_base))
    }

    /// Create a client with an explicit API base and the default timeout.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_timeout(api_base, Duration::from_secs(30))
    }

    pub fn with_timeout(api_base: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("docdesk/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Validate credentials against the backend.
    pub fn login(&self, email: &str, password: &str) -> Result<UserInfo, ApiError> {
        let url = format!("{}/api/login", self.api_base);
        let body = serde_json::json!({ "email": email, "password": password });
        let json = self.post_json(&url, &body)?;

        let user = json
            .get("user")
            .cloned()
            .ok_or_else(|| ApiError::Parse("Missing user in login response".into()))?;
        serde_json::from_value(user).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Dashboard counts, trend, and recent uploads.
    pub fn dashboard_summary(&self, filters: &ListFilters) -> Result<DashboardSummary, ApiError> {
        let url = format!("{}/api/dashboard_summary", self.api_base);
        let json = self.get_json(&url, &filters.query())?;
        serde_json::from_value(json).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// All documents matching the filters, newest first.
    pub fn monitoring(&self, filters: &ListFilters) -> Result<Vec<DocSummary>, ApiError> {
        let url = format!("{}/api/monitoring", self.api_base);
        self.doc_list(&url, filters)
    }

    /// Documents whose extraction succeeded but whose ERP entry failed —
    /// the human-review queue.
    pub fn review_queue(&self, filters: &ListFilters) -> Result<Vec<DocSummary>, ApiError> {
        let url = format!("{}/api/human_review", self.api_base);
        self.doc_list(&url, filters)
    }

    pub fn clients(&self) -> Result<Vec<ClientInfo>, ApiError> {
        let url = format!("{}/api/clients", self.api_base);
        let json = self.get_json(&url, &[])?;
        let data = json.get("data").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub fn doc_formats(&self, client_id: i64) -> Result<Vec<DocFormat>, ApiError> {
        let url = format!("{}/api/doc_formats/{}", self.api_base, client_id);
        let json = self.get_json(&url, &[])?;
        let data = json.get("data").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch the review payload for one document.
    ///
    /// A missing or non-object `data` member falls back to the response
    /// root, matching what the backend actually serves; anything still
    /// unusable is a parse error ("failed to load document" upstream).
    pub fn review_document(&self, doc_id: i64) -> Result<ReviewDocument, ApiError> {
        let url = format!("{}/api/human_review/{}", self.api_base, doc_id);
        let mut json = self.get_json(&url, &[])?;

        let payload = match json.get_mut("data") {
            Some(data @ Value::Object(_)) => data.take(),
            _ => json,
        };
        ReviewDocument::from_payload(payload)
    }

    /// Persist the edited record as the document's new corrected data.
    /// Returns the server's confirmation message. No client-side
    /// re-validation happens before or after — the server is the source
    /// of truth for correctness.
    pub fn save_corrected(
        &self,
        doc_id: i64,
        record: &ReconciledRecord,
    ) -> Result<String, ApiError> {
        let url = format!("{}/api/human_review/update_corrected/{}", self.api_base, doc_id);
        let body = serde_json::json!({ "corrected_json": record });
        let json = self.post_json(&url, &body)?;

        Ok(json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Saved")
            .to_string())
    }

    /// Upload one or more files for a client/format pair.
    pub fn upload(
        &self,
        client_id: &str,
        doc_format_id: &str,
        files: &[&Path],
    ) -> Result<UploadReceipt, ApiError> {
        let url = format!("{}/api/upload", self.api_base);

        let mut form = reqwest::blocking::multipart::Form::new()
            .text("client_id", client_id.to_string())
            .text("doc_format_id", doc_format_id.to_string());
        for path in files {
            form = form
                .file("files", path)
                .map_err(|e| ApiError::Io(e.to_string()))?;
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let json = Self::check(response)?;

        let message = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Uploaded")
            .to_string();
        let files = json
            .get("data")
            .cloned()
            .map(|v| serde_json::from_value(v).map_err(|e| ApiError::Parse(e.to_string())))
            .transpose()?
            .unwrap_or_default();

        Ok(UploadReceipt { message, files })
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn doc_list(&self, url: &str, filters: &ListFilters) -> Result<Vec<DocSummary>, ApiError> {
        let json = self.get_json(url, &filters.query())?;
        // A successful envelope without data is an empty list, not an error.
        let data = json.get("data").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response)
    }

    fn check(response: reqwest::blocking::Response) -> Result<Value, ApiError> {
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            let message = error_message(&body);
            if status == 400 || status == 422 {
                return Err(ApiError::Validation(message));
            }
            return Err(ApiError::Http(status, message));
        }

        response
            .json::<Value>()
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Pull the `message` out of an error envelope, falling back to the raw
/// body text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn review_document_splits_payload() {
        let payload = json!({
            "doc": { "id": 3, "client_name": "Acme", "file_url": "http://x/pdf/3" },
            "extracted_data": { "Branch": "Pune" },
            "corrected_data": {},
            "ValidationStatus": { "FailedFields": [] },
            "raw_extracted": { "final_data": { "Branch": "Pune" } }
        });

        let doc = ReviewDocument::from_payload(payload).unwrap();
        assert_eq!(doc.doc.id, Some(3));
        assert_eq!(doc.doc.client_name.as_deref(), Some("Acme"));
        assert_eq!(doc.extracted["Branch"], json!("Pune"));
        assert!(doc.corrected.is_empty());
        assert!(doc.payload_extra.contains_key("ValidationStatus"));
        assert!(!doc.payload_extra.contains_key("raw_extracted"));
        assert!(!doc.payload_extra.contains_key("extracted_data"));
    }

    #[test]
    fn review_document_doc_falls_back_to_root() {
        let payload = json!({
            "id": 8,
            "client_name": "Root Client",
            "extracted_data": { "Branch": "Pune" }
        });
        let doc = ReviewDocument::from_payload(payload).unwrap();
        assert_eq!(doc.doc.id, Some(8));
        assert_eq!(doc.doc.client_name.as_deref(), Some("Root Client"));
    }

    #[test]
    fn review_document_rejects_non_object() {
        let err = ReviewDocument::from_payload(json!("nope")).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn review_document_null_records_treated_as_absent() {
        let payload = json!({
            "extracted_data": null,
            "corrected_data": "not a record"
        });
        let doc = ReviewDocument::from_payload(payload).unwrap();
        assert!(doc.extracted.is_empty());
        assert!(doc.corrected.is_empty());
    }

    #[test]
    fn list_filters_query_skips_unset() {
        let filters = ListFilters {
            client_id: Some("4".into()),
            from_date: None,
            to_date: Some("2026-08-30".into()),
            status: None,
        };
        assert_eq!(
            filters.query(),
            vec![("client_id", "4"), ("to_date", "2026-08-30")]
        );
    }

    #[test]
    fn error_message_prefers_envelope_message() {
        assert_eq!(
            error_message(r#"{"status":"error","message":"Document not found"}"#),
            "Document not found"
        );
        assert_eq!(error_message("<html>502</html>"), "<html>502</html>");
    }

    #[test]
    fn api_base_trailing_slash_stripped() {
        let client = ApiClient::new("http://127.0.0.1:5050/");
        assert_eq!(client.api_base(), "http://127.0.0.1:5050");
    }
}
