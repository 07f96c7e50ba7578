//! Config command: inspect and update the persistent settings file.

use docdesk_config::Settings;

use crate::util::print_json;
use crate::CliError;

pub fn cmd_config(
    set_api_base: Option<String>,
    set_timeout: Option<u64>,
    json: bool,
) -> Result<(), CliError> {
    let mut settings = Settings::load();

    let dirty = set_api_base.is_some() || set_timeout.is_some();
    if let Some(base) = set_api_base {
        settings.api_base = base.trim_end_matches('/').to_string();
    }
    if let Some(secs) = set_timeout {
        if secs == 0 {
            return Err(CliError::usage("timeout must be at least 1 second"));
        }
        settings.timeout_secs = secs;
    }
    if dirty {
        settings.save().map_err(CliError::error)?;
    }

    if json {
        print_json(&serde_json::json!({
            "path": Settings::config_path_display(),
            "api_base": settings.api_base,
            "timeout_secs": settings.timeout_secs,
        }))
    } else {
        println!("path:          {}", Settings::config_path_display());
        println!("api base:      {}", settings.api_base);
        println!("timeout secs:  {}", settings.timeout_secs);
        Ok(())
    }
}
