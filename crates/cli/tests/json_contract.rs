// Integration tests enforcing the --json stdout contract.
//
// These tests guarantee that stdout from --json commands is:
//   1. Valid JSON
//   2. Exactly one JSON value (no extra lines, no banners)
//   3. The correct shape for its command type
//
// Run with: cargo test -p docdesk-cli --test json_contract -- --nocapture

use std::process::Command;

use httpmock::prelude::*;
use serde_json::json;

/// Build a docdesk command with config/session isolated to a temp dir.
fn docdesk(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docdesk"));
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd.env_remove("DOCDESK_API_BASE");
    cmd.env_remove("DOCDESK_PASSWORD");
    cmd
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");

    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!(
            "stdout must be valid JSON.\nParse error: {}\nstdout:\n{}",
            e, trimmed
        )
    })
}

fn review_payload() -> serde_json::Value {
    json!({
        "status": "success",
        "data": {
            "doc": { "id": 42, "client_name": "Acme", "doc_type": "LR" },
            "extracted_data": { "branch": "Pune", "Invoice   No": "INV-77" },
            "corrected_data": {},
            "ValidationStatus": {
                "FailedFields": [ { "Field": "Invoice No", "Reason": "amount mismatch" } ]
            }
        }
    })
}

#[test]
fn show_json_has_doc_source_record_failures() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review/42");
        then.status(200).json_body(review_payload());
    });
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args(["--api-base", &server.base_url(), "show", "42", "--json"])
        .output()
        .expect("docdesk show --json");

    assert!(
        output.status.success(),
        "exit: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    let obj = val.as_object().expect("should be JSON object");
    assert_eq!(obj["doc"]["id"], json!(42));
    assert_eq!(obj["source"], json!("extracted"));

    // Keys come back canonicalized, canonical order
    let record = obj["record"].as_object().unwrap();
    let keys: Vec<&String> = record.keys().collect();
    assert_eq!(keys, vec!["Branch", "Invoice No"]);
    assert_eq!(record["Branch"], json!("Pune"));
    assert_eq!(record["Invoice No"], json!("INV-77"));

    let failures = obj["failures"].as_object().unwrap();
    assert_eq!(failures["Invoice No"], json!("amount mismatch"));
    assert!(!failures.contains_key("Branch"));
}

#[test]
fn show_missing_document_exits_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review/999");
        then.status(404)
            .json_body(json!({ "status": "error", "message": "Document not found" }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args(["--api-base", &server.base_url(), "show", "999"])
        .output()
        .expect("docdesk show");

    assert_eq!(output.status.code(), Some(13));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Document not found"), "stderr: {}", stderr);
}

#[test]
fn fix_without_save_edits_locally() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review/42");
        then.status(200).json_body(review_payload());
    });
    // No POST mock: a save attempt would fail the test via exit code.
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args([
            "--api-base",
            &server.base_url(),
            "fix",
            "42",
            "--set",
            "Invoice No=INV-78",
            "--json",
        ])
        .output()
        .expect("docdesk fix --json");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["record"]["Invoice No"], json!("INV-78"));
    assert_eq!(val["saved"], json!(false));
    // Edits never clear highlights; only server re-validation does
    assert_eq!(val["failures"]["Invoice No"], json!("amount mismatch"));
}

#[test]
fn fix_save_posts_edited_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review/42");
        then.status(200).json_body(review_payload());
    });
    let save = server.mock(|when, then| {
        when.method(POST)
            .path("/api/human_review/update_corrected/42")
            .json_body(json!({
                "corrected_json": { "Branch": "Pune", "Invoice No": "INV-78" }
            }));
        then.status(200)
            .json_body(json!({ "status": "success", "message": "Corrected data updated" }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args([
            "--api-base",
            &server.base_url(),
            "fix",
            "42",
            "--set",
            "Invoice No=INV-78",
            "--save",
            "--json",
        ])
        .output()
        .expect("docdesk fix --save");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    save.assert();

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["saved"], json!(true));
    assert_eq!(val["message"], json!("Corrected data updated"));
}

#[test]
fn fix_save_failure_still_shows_edited_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review/42");
        then.status(200).json_body(review_payload());
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/human_review/update_corrected/42");
        then.status(500)
            .json_body(json!({ "status": "error", "message": "database unavailable" }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args([
            "--api-base",
            &server.base_url(),
            "fix",
            "42",
            "--set",
            "Invoice No=INV-78",
            "--save",
            "--json",
        ])
        .output()
        .expect("docdesk fix --save");

    // Save failed, so the exit is nonzero, but the edits must still be
    // printed so the user can retry from what they typed.
    assert_eq!(output.status.code(), Some(1));
    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["record"]["Invoice No"], json!("INV-78"));
    assert_eq!(val["saved"], json!(false));
    assert!(val.get("message").is_none());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("database unavailable"), "stderr: {}", stderr);
}

#[test]
fn fix_unknown_field_is_usage_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review/42");
        then.status(200).json_body(review_payload());
    });
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args([
            "--api-base",
            &server.base_url(),
            "fix",
            "42",
            "--set",
            "Bogus Field=x",
        ])
        .output()
        .expect("docdesk fix");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown field"), "stderr: {}", stderr);
    assert!(stderr.contains("known fields"), "stderr: {}", stderr);
}

#[test]
fn queue_json_is_array() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review");
        then.status(200).json_body(json!({
            "status": "success",
            "data": [ { "id": 42, "client_name": "Acme", "erp_entry_status": "failed" } ]
        }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args(["--api-base", &server.base_url(), "queue", "--json"])
        .output()
        .expect("docdesk queue --json");

    assert!(output.status.success());
    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    let rows = val.as_array().expect("should be JSON array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(42));
}

#[test]
fn show_lists_failures_for_fields_missing_from_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/human_review/42");
        then.status(200).json_body(json!({
            "status": "success",
            "data": {
                "doc": { "id": 42 },
                "extracted_data": { "Branch": "Pune" },
                "corrected_data": {},
                "ValidationStatus": {
                    "FailedFields": [
                        { "Field": "Consignee", "Reason": "missing entirely" }
                    ]
                }
            }
        }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args(["--api-base", &server.base_url(), "show", "42", "--json"])
        .output()
        .expect("docdesk show --json");

    assert!(output.status.success());
    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    // Consignee never made it into the record, but its failure is still
    // reported, keyed by the normalized field id.
    assert!(val["record"].get("Consignee").is_none());
    assert_eq!(val["failures"]["consignee"], json!("missing entirely"));
}

#[test]
fn config_set_persists_and_reads_back() {
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args(["config", "--set-api-base", "http://10.0.0.9:5050/"])
        .output()
        .expect("docdesk config --set-api-base");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = docdesk(dir.path())
        .args(["config", "--json"])
        .output()
        .expect("docdesk config --json");
    assert!(output.status.success());

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["api_base"], json!("http://10.0.0.9:5050"));
    assert_eq!(val["timeout_secs"], json!(30));
    assert!(val["path"].as_str().unwrap().ends_with("config.toml"));
}

#[test]
fn whoami_without_session_exits_not_auth() {
    let dir = tempfile::tempdir().unwrap();

    let output = docdesk(dir.path())
        .args(["whoami"])
        .output()
        .expect("docdesk whoami");

    assert_eq!(output.status.code(), Some(10));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not logged in"), "stderr: {}", stderr);
    assert!(stderr.contains("docdesk login"), "stderr: {}", stderr);
}
