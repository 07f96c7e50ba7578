// docdesk CLI - document review dashboard operations from the terminal

mod auth;
mod exit_codes;
mod lists;
mod review;
mod settings;
mod upload;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use docdesk_api_client::{ApiError, ListFilters};

use exit_codes::{api_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "docdesk")]
#[command(about = "Document review dashboard, from the terminal")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides the saved session and config file)
    #[arg(long, global = true, env = "DOCDESK_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the backend and store a session
    #[command(after_help = "\
Examples:
  docdesk login --email ops@example.com
  DOCDESK_PASSWORD=... docdesk login --email ops@example.com
  docdesk login --api-base http://10.0.0.5:5050")]
    Login {
        /// Account email (prompted if omitted)
        #[arg(long)]
        email: Option<String>,

        /// Account password (DOCDESK_PASSWORD env or prompt if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Delete the stored session
    Logout,

    /// Show the current session
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dashboard summary: counts, trend, recent uploads
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all documents matching the filters
    #[command(after_help = "\
Examples:
  docdesk monitoring
  docdesk monitoring --client-id 4 --status failed
  docdesk monitoring --from-date 2026-08-01 --to-date 2026-08-31 --json")]
    Monitoring {
        #[command(flatten)]
        filters: FilterArgs,

        /// Filter by overall status
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List documents waiting for human review
    Queue {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List clients
    Clients {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List document formats configured for a client
    Formats {
        /// Client id
        client_id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a document's reconciled record and validation failures
    #[command(after_help = "\
Examples:
  docdesk show 42
  docdesk show 42 --failed
  docdesk show 42 --json | jq .failures")]
    Show {
        /// Document id
        doc_id: i64,

        /// Only show failing fields
        #[arg(long)]
        failed: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a document's record and optionally save it back
    #[command(after_help = "\
Examples:
  docdesk fix 42 --set 'Invoice No=INV-78'
  docdesk fix 42 --set 'Branch=Pune' --set 'Date=2026-08-30' --save
  docdesk fix 42 --set 'Date=2026-08-30' --refresh --json

Values are stored as strings, exactly as typed. Saved highlights stay
until the server re-validates the document.")]
    Fix {
        /// Document id
        doc_id: i64,

        /// Field assignment 'Label=value' (repeatable)
        #[arg(long, value_name = "EXPR")]
        set: Vec<String>,

        /// Save the edited record back to the server
        #[arg(long)]
        save: bool,

        /// Re-derive failure highlights from the retained validation report
        #[arg(long)]
        refresh: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or update the persistent settings file
    #[command(after_help = "\
Examples:
  docdesk config
  docdesk config --set-api-base http://10.0.0.5:5050
  docdesk config --set-timeout 60 --json")]
    Config {
        /// Set the default backend base URL
        #[arg(long, value_name = "URL")]
        set_api_base: Option<String>,

        /// Set the HTTP timeout in seconds
        #[arg(long, value_name = "SECS")]
        set_timeout: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload documents for processing
    Upload {
        /// Client id
        #[arg(long = "client")]
        client_id: String,

        /// Document format id
        #[arg(long = "format")]
        doc_format_id: String,

        /// Files to upload
        files: Vec<PathBuf>,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Filter by client id
    #[arg(long)]
    client_id: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    from_date: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    to_date: Option<String>,
}

impl FilterArgs {
    fn into_filters(self, status: Option<String>) -> ListFilters {
        ListFilters {
            client_id: self.client_id,
            from_date: self.from_date,
            to_date: self.to_date,
            status,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let api_base = cli.api_base;

    let result = match cli.command {
        Commands::Login { email, password } => auth::cmd_login(email, password, api_base),
        Commands::Logout => auth::cmd_logout(),
        Commands::Whoami { json } => auth::cmd_whoami(json),
        Commands::Summary { filters, json } => {
            lists::cmd_summary(util::client(api_base), filters.into_filters(None), json)
        }
        Commands::Monitoring {
            filters,
            status,
            json,
        } => lists::cmd_monitoring(util::client(api_base), filters.into_filters(status), json),
        Commands::Queue { filters, json } => {
            lists::cmd_queue(util::client(api_base), filters.into_filters(None), json)
        }
        Commands::Clients { json } => lists::cmd_clients(util::client(api_base), json),
        Commands::Formats { client_id, json } => {
            lists::cmd_formats(util::client(api_base), client_id, json)
        }
        Commands::Show {
            doc_id,
            failed,
            json,
        } => review::cmd_show(util::client(api_base), doc_id, failed, json),
        Commands::Fix {
            doc_id,
            set,
            save,
            refresh,
            json,
        } => review::cmd_fix(util::client(api_base), doc_id, set, save, refresh, json),
        Commands::Config {
            set_api_base,
            set_timeout,
            json,
        } => settings::cmd_config(set_api_base, set_timeout, json),
        Commands::Upload {
            client_id,
            doc_format_id,
            files,
        } => upload::cmd_upload(util::client(api_base), client_id, doc_format_id, files),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    /// Create error from an API error with the proper exit code.
    pub fn api(err: ApiError) -> Self {
        let hint = match &err {
            ApiError::NotAuthenticated => Some("run `docdesk login` first".to_string()),
            ApiError::Network(_) => {
                Some("is the backend running? check --api-base".to_string())
            }
            _ => None,
        };
        Self {
            code: api_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
