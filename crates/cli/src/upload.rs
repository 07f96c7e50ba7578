//! Upload command: send documents for processing.

use std::path::PathBuf;

use docdesk_api_client::ApiClient;

use crate::CliError;

pub fn cmd_upload(
    client: ApiClient,
    client_id: String,
    doc_format_id: String,
    files: Vec<PathBuf>,
) -> Result<(), CliError> {
    if files.is_empty() {
        return Err(CliError::usage("no files given")
            .with_hint("docdesk upload --client 1 --format 5 a.pdf b.pdf"));
    }
    for file in &files {
        if !file.is_file() {
            return Err(CliError::usage(format!("file not found: {}", file.display())));
        }
    }

    let paths: Vec<&std::path::Path> = files.iter().map(PathBuf::as_path).collect();
    let receipt = client
        .upload(&client_id, &doc_format_id, &paths)
        .map_err(CliError::api)?;

    eprintln!("{}", receipt.message);
    for file in &receipt.files {
        match &file.saved_path {
            Some(path) => println!("{}  {}", file.file_name, path),
            None => println!("{}", file.file_name),
        }
    }
    Ok(())
}
