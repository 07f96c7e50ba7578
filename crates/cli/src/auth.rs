//! Auth commands: login, logout, whoami.
//!
//! `docdesk login`   — validate credentials, store a session
//! `docdesk logout`  — delete the stored session
//! `docdesk whoami`  — show the current session

use std::io::{self, Write};

use docdesk_api_client::{
    delete_session, load_session, save_session, ApiClient, ApiError, StoredSession,
};
use docdesk_config::Settings;

use crate::exit_codes::*;
use crate::util;
use crate::CliError;

pub fn cmd_login(
    email: Option<String>,
    password: Option<String>,
    api_base_flag: Option<String>,
) -> Result<(), CliError> {
    let email = match email {
        Some(e) => e,
        None => prompt("Email: ")?,
    };

    // Resolve password: --password flag > DOCDESK_PASSWORD env > prompt
    let password = if let Some(p) = password {
        p
    } else if let Ok(p) = std::env::var("DOCDESK_PASSWORD") {
        p
    } else {
        prompt("Password: ")?
    };

    // Login ignores any stored session's base: the flag (or env) wins,
    // then the config file.
    let settings = Settings::load();
    let api_base = api_base_flag.unwrap_or_else(|| settings.api_base.clone());

    let client = ApiClient::new(api_base.clone());
    let user = client.login(&email, &password).map_err(|e| match e {
        ApiError::Http(401, _) | ApiError::Http(403, _) => CliError {
            code: EXIT_NOT_AUTH,
            message: "Invalid credentials".into(),
            hint: None,
        },
        ApiError::Network(msg) => CliError {
            code: EXIT_NETWORK,
            message: format!("Cannot reach backend at {}: {}", api_base, msg),
            hint: Some("check --api-base or the config file".into()),
        },
        other => CliError::api(other),
    })?;

    let session = StoredSession::new(user.email.clone(), Some(user.id), api_base);
    save_session(&session).map_err(CliError::error)?;

    eprintln!("Logged in as {} (user #{})", user.email, user.id);
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    delete_session().map_err(CliError::error)?;
    eprintln!("Logged out");
    Ok(())
}

pub fn cmd_whoami(json: bool) -> Result<(), CliError> {
    let session = load_session().ok_or(CliError {
        code: EXIT_NOT_AUTH,
        message: "Not logged in".into(),
        hint: Some("run `docdesk login` first".into()),
    })?;

    if json {
        util::print_json(&serde_json::json!({
            "email": session.email,
            "user_id": session.user_id,
            "api_base": session.api_base,
            "expires_at": session.expires_at,
        }))
    } else {
        println!("email:     {}", session.email);
        if let Some(id) = session.user_id {
            println!("user id:   {}", id);
        }
        println!("api base:  {}", session.api_base);
        println!("expires:   {}", session.expires_at);
        Ok(())
    }
}

fn prompt(label: &str) -> Result<String, CliError> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(CliError::usage("stdin is not a TTY")
            .with_hint("pass --email/--password or set DOCDESK_PASSWORD"));
    }

    eprint!("{}", label);
    io::stderr().flush().ok();
    let mut buf = String::new();
    io::stdin()
        .read_line(&mut buf)
        .map_err(|e| CliError::error(e.to_string()))?;
    let trimmed = buf.trim().to_string();
    if trimmed.is_empty() {
        return Err(CliError::usage("empty input"));
    }
    Ok(trimmed)
}
