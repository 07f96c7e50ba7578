//! Stored login session.
//!
//! Reads/writes <config>/docdesk/session.json (0600 on Unix). The session
//! is an explicit, expiring object; there is no ambient "logged in" flag
//! anywhere. A command either finds a live session on disk or it doesn't.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Sessions expire client-side after this many hours.
pub const SESSION_TTL_HOURS: i64 = 12;

/// A login session persisted between CLI invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    /// Email the user logged in with (for display)
    pub email: String,
    /// Backend user id, when the server reported one
    #[serde(default)]
    pub user_id: Option<i64>,
    /// API base URL (e.g., "http://127.0.0.1:5050")
    pub api_base: String,
    pub logged_in_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(email: String, user_id: Option<i64>, api_base: String) -> Self {
        let now = Utc::now();
        Self {
            email,
            user_id,
            api_base,
            logged_in_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Returns the path to the session file.
pub fn session_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("docdesk/session.json"))
}

/// Load the saved session from disk.
/// Returns None if no session is saved, the file is invalid, or the
/// session has expired.
pub fn load_session() -> Option<StoredSession> {
    let path = session_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    let session: StoredSession = serde_json::from_str(&contents).ok()?;
    if session.is_expired() {
        return None;
    }
    Some(session)
}

/// Save a session to disk, creating the parent directory if needed.
/// Sets 0600 permissions on Unix.
pub fn save_session(session: &StoredSession) -> Result<(), String> {
    let path = session_file_path().ok_or("Could not determine config directory")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(session)
        .map_err(|e| format!("Failed to serialize session: {}", e))?;

    std::fs::write(&path, &contents).map_err(|e| format!("Failed to write session file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete the saved session.
pub fn delete_session() -> Result<(), String> {
    let Some(path) = session_file_path() else {
        return Ok(());
    };
    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| format!("Failed to delete session file: {}", e))?;
    }
    Ok(())
}
