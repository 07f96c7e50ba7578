//! List commands: summary, monitoring, queue, clients, formats.

use docdesk_api_client::{ApiClient, DocSummary, ListFilters};

use crate::util::{cell, print_json, print_table};
use crate::CliError;

pub fn cmd_summary(client: ApiClient, filters: ListFilters, json: bool) -> Result<(), CliError> {
    let summary = client.dashboard_summary(&filters).map_err(CliError::api)?;

    if json {
        return print_json(
            &serde_json::to_value(&summary).map_err(|e| CliError::error(e.to_string()))?,
        );
    }

    let counts = &summary.summary;
    println!("total:        {}", counts.total_docs);
    println!("in progress:  {}", counts.in_progress);
    println!("completed:    {}", counts.completed);
    println!("failed:       {}", counts.failed);
    println!("human review: {}", counts.human_review);

    if !summary.trend.is_empty() {
        println!();
        let rows: Vec<Vec<String>> = summary
            .trend
            .iter()
            .map(|p| vec![p.date.clone(), p.documents.to_string()])
            .collect();
        print_table(&["date", "documents"], &rows)?;
    }

    if !summary.recent.is_empty() {
        println!();
        let rows: Vec<Vec<String>> = summary
            .recent
            .iter()
            .map(|r| {
                vec![
                    cell(&r.client),
                    cell(&r.doc_type),
                    cell(&r.file_name),
                    cell(&r.uploaded_on),
                    cell(&r.status),
                ]
            })
            .collect();
        print_table(&["client", "type", "file", "uploaded", "status"], &rows)?;
    }

    Ok(())
}

pub fn cmd_monitoring(client: ApiClient, filters: ListFilters, json: bool) -> Result<(), CliError> {
    let docs = client.monitoring(&filters).map_err(CliError::api)?;
    print_doc_list(&docs, json)
}

pub fn cmd_queue(client: ApiClient, filters: ListFilters, json: bool) -> Result<(), CliError> {
    let docs = client.review_queue(&filters).map_err(CliError::api)?;
    print_doc_list(&docs, json)
}

fn print_doc_list(docs: &[DocSummary], json: bool) -> Result<(), CliError> {
    if json {
        return print_json(
            &serde_json::to_value(docs).map_err(|e| CliError::error(e.to_string()))?,
        );
    }

    if docs.is_empty() {
        eprintln!("no documents");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = docs
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                cell(&d.client_name),
                cell(&d.doc_type),
                cell(&d.file_name),
                cell(&d.uploaded_on),
                d.overall_status
                    .clone()
                    .or_else(|| d.data_extraction_status.clone())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["id", "client", "type", "file", "uploaded", "status"], &rows)
}

pub fn cmd_clients(client: ApiClient, json: bool) -> Result<(), CliError> {
    let clients = client.clients().map_err(CliError::api)?;

    if json {
        return print_json(
            &serde_json::to_value(&clients).map_err(|e| CliError::error(e.to_string()))?,
        );
    }

    let rows: Vec<Vec<String>> = clients
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.clone()])
        .collect();
    print_table(&["id", "name"], &rows)
}

pub fn cmd_formats(client: ApiClient, client_id: i64, json: bool) -> Result<(), CliError> {
    let formats = client.doc_formats(client_id).map_err(CliError::api)?;

    if json {
        return print_json(
            &serde_json::to_value(&formats).map_err(|e| CliError::error(e.to_string()))?,
        );
    }

    let rows: Vec<Vec<String>> = formats
        .iter()
        .map(|f| {
            vec![
                f.id.to_string(),
                f.name.clone(),
                cell(&f.doc_type),
                cell(&f.file_type),
            ]
        })
        .collect();
    print_table(&["id", "name", "type", "file type"], &rows)
}
