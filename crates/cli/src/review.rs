//! Review commands: show a document's reconciled record, fix and save it.

use std::collections::BTreeSet;

use serde_json::Value;

use docdesk_api_client::{ApiClient, ReviewDocument};
use docdesk_recon::{normalize_key, RefreshOutcome, ReviewSession, CANONICAL_FIELDS};

use crate::util::{cell, print_json, print_table};
use crate::CliError;

pub fn cmd_show(
    client: ApiClient,
    doc_id: i64,
    failed_only: bool,
    json: bool,
) -> Result<(), CliError> {
    let doc = client.review_document(doc_id).map_err(CliError::api)?;
    let session = doc.session();

    if json {
        return print_json(&session_json(&doc, &session));
    }

    print_doc_header(&doc);
    println!("source:  {}", session.source_kind());
    println!();
    print_record(&session, failed_only)
}

pub fn cmd_fix(
    client: ApiClient,
    doc_id: i64,
    assignments: Vec<String>,
    save: bool,
    refresh: bool,
    json: bool,
) -> Result<(), CliError> {
    let doc = client.review_document(doc_id).map_err(CliError::api)?;
    let mut session = doc.session();

    for expr in &assignments {
        let (label, value) = crate::util::parse_assignment(expr)?;
        session
            .apply_edit(&label, Value::String(value))
            .map_err(|e| {
                CliError::usage(e.to_string())
                    .with_hint(format!("known fields: {}", CANONICAL_FIELDS.join(", ")))
            })?;
    }

    if refresh {
        match session.refresh_failure_index() {
            RefreshOutcome::Refreshed(n) => eprintln!("{} failing field(s)", n),
            RefreshOutcome::NothingToRefresh => {
                eprintln!("no validation report to refresh from")
            }
        }
    }

    // A failed save must not swallow the edits: the record is printed
    // either way so the user can retry from what they typed.
    let (message, save_error) = if save {
        match client.save_corrected(doc_id, session.record()) {
            Ok(msg) => {
                eprintln!("{}", msg);
                (Some(msg), None)
            }
            Err(e) => (None, Some(CliError::api(e))),
        }
    } else {
        (None, None)
    };

    if json {
        let mut out = session_json(&doc, &session);
        out["saved"] = Value::Bool(save && save_error.is_none());
        if let Some(msg) = message {
            out["message"] = Value::String(msg);
        }
        print_json(&out)?;
    } else {
        print_record(&session, false)?;
    }

    match save_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn print_doc_header(doc: &ReviewDocument) {
    let id = doc
        .doc
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".into());
    println!("doc:     #{}", id);
    if doc.doc.client_name.is_some() || doc.doc.doc_type.is_some() {
        println!(
            "client:  {} ({})",
            cell(&doc.doc.client_name),
            cell(&doc.doc.doc_type)
        );
    }
    if let Some(ref file) = doc.doc.file_name {
        println!("file:    {}", file);
    }
    if let Some(ref status) = doc.doc.erp_entry_status {
        println!("status:  {}", status);
    }
}

fn print_record(session: &ReviewSession, failed_only: bool) -> Result<(), CliError> {
    let index = session.failure_index();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (field, value) in session.record() {
        let failed = index.is_failed(field);
        if failed_only && !failed {
            continue;
        }
        let status = if failed {
            format!("FAIL: {}", index.reason(field).unwrap_or_default())
        } else {
            String::new()
        };
        rows.push(vec![field.clone(), render_value(value), status]);
    }

    // Report entries can name fields the record doesn't carry; they still
    // need fixing, so list them under their normalized id.
    let covered = covered_ids(session);
    for (id, reason) in index.entries() {
        if !covered.contains(id) {
            rows.push(vec![id.to_string(), String::new(), format!("FAIL: {}", reason)]);
        }
    }

    if rows.is_empty() {
        eprintln!("no fields");
        return Ok(());
    }
    print_table(&["field", "value", "status"], &rows)
}

fn covered_ids(session: &ReviewSession) -> BTreeSet<String> {
    session.record().keys().map(|k| normalize_key(k)).collect()
}

fn session_json(doc: &ReviewDocument, session: &ReviewSession) -> Value {
    let mut failures = serde_json::Map::new();
    for (field, _) in session.record() {
        if session.failure_index().is_failed(field) {
            failures.insert(
                field.clone(),
                Value::String(
                    session
                        .failure_index()
                        .reason(field)
                        .unwrap_or_default()
                        .to_string(),
                ),
            );
        }
    }
    let covered = covered_ids(session);
    for (id, reason) in session.failure_index().entries() {
        if !covered.contains(id) {
            failures.insert(id.to_string(), Value::String(reason.to_string()));
        }
    }

    serde_json::json!({
        "doc": doc.doc,
        "source": session.source_kind().to_string(),
        "record": session.record(),
        "failures": failures,
    })
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
