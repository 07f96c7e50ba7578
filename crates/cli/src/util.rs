//! Shared CLI helpers: client construction, assignment parsing, table output.

use std::io::{self, Write};
use std::time::Duration;

use docdesk_api_client::{load_session, ApiClient};
use docdesk_config::Settings;

use crate::CliError;

/// Resolve the backend base URL.
/// Precedence: --api-base flag (or DOCDESK_API_BASE env, via clap) >
/// saved session > config file.
pub fn resolve_api_base(flag: Option<String>, settings: &Settings) -> String {
    flag.or_else(|| load_session().map(|s| s.api_base))
        .unwrap_or_else(|| settings.api_base.clone())
}

/// Build an API client against the resolved base URL.
pub fn client(api_base_flag: Option<String>) -> ApiClient {
    let settings = Settings::load();
    let api_base = resolve_api_base(api_base_flag, &settings);
    ApiClient::with_timeout(api_base, Duration::from_secs(settings.timeout_secs))
}

/// Parse a `Label=value` assignment. The label keeps interior spaces;
/// one layer of surrounding quotes is stripped from the value.
pub fn parse_assignment(expr: &str) -> Result<(String, String), CliError> {
    let Some(pos) = expr.find('=') else {
        return Err(CliError::usage(format!("no '=' found in --set {:?}", expr))
            .with_hint("syntax: --set 'Invoice No=INV-42'"));
    };

    let label = expr[..pos].trim();
    if label.is_empty() {
        return Err(CliError::usage(format!("empty field label in --set {:?}", expr)));
    }

    let value = expr[pos + 1..].trim();
    let value = if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
        || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
    {
        &value[1..value.len() - 1]
    } else {
        value
    };

    Ok((label.to_string(), value.to_string()))
}

/// Print a column-aligned table to stdout.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) -> Result<(), CliError> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let write_row = |out: &mut io::StdoutLock<'_>, cells: &[String]| -> io::Result<()> {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            if i + 1 < cells.len() {
                line.push_str(&format!("{:width$}", cell, width = widths[i]));
            } else {
                // Last column unpadded, no trailing spaces
                line.push_str(cell);
            }
        }
        writeln!(out, "{}", line.trim_end())
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(&mut out, &header_cells).map_err(|e| CliError::error(e.to_string()))?;

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule).map_err(|e| CliError::error(e.to_string()))?;

    for row in rows {
        write_row(&mut out, row).map_err(|e| CliError::error(e.to_string()))?;
    }

    Ok(())
}

/// Print a single JSON value to stdout, one value, newline-terminated.
pub fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|e| CliError::error(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

/// Render an optional string cell for table output.
pub fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        let (label, value) = parse_assignment("Invoice No=INV-42=x").unwrap();
        assert_eq!(label, "Invoice No");
        assert_eq!(value, "INV-42=x");
    }

    #[test]
    fn assignment_strips_one_quote_layer() {
        let (_, value) = parse_assignment("Branch='Pune Depot'").unwrap();
        assert_eq!(value, "Pune Depot");
        let (_, value) = parse_assignment("Branch=\"''\"").unwrap();
        assert_eq!(value, "''");
    }

    #[test]
    fn assignment_without_equals_is_usage_error() {
        let err = parse_assignment("BranchPune").unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
    }

    #[test]
    fn assignment_empty_label_rejected() {
        assert!(parse_assignment("=Pune").is_err());
        assert!(parse_assignment("   =Pune").is_err());
    }

    #[test]
    fn api_base_flag_wins_over_settings() {
        let settings = Settings::default();
        let base = resolve_api_base(Some("http://10.0.0.2:5050".into()), &settings);
        assert_eq!(base, "http://10.0.0.2:5050");
    }
}
