//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, missing file) |
//! | 10-19   | backend   | Backend API codes                        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use docdesk_api_client::ApiError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Backend API (10-19)
// =============================================================================

/// Not authenticated (no saved session, or session expired).
pub const EXIT_NOT_AUTH: u8 = 10;

/// Network error communicating with the backend.
pub const EXIT_NETWORK: u8 = 11;

/// Server returned a validation error (bad request, unprocessable entity).
pub const EXIT_VALIDATION: u8 = 12;

/// Requested resource does not exist (document, client, format).
pub const EXIT_NOT_FOUND: u8 = 13;

/// Response could not be parsed (malformed envelope or payload).
pub const EXIT_PARSE: u8 = 14;

/// Map an ApiError to its exit code.
pub fn api_exit_code(err: &ApiError) -> u8 {
    match err {
        ApiError::NotAuthenticated => EXIT_NOT_AUTH,
        ApiError::Network(_) => EXIT_NETWORK,
        ApiError::Validation(_) => EXIT_VALIDATION,
        ApiError::Http(404, _) => EXIT_NOT_FOUND,
        ApiError::Http(401, _) | ApiError::Http(403, _) => EXIT_NOT_AUTH,
        ApiError::Http(_, _) => EXIT_ERROR,
        ApiError::Parse(_) => EXIT_PARSE,
        ApiError::Io(_) => EXIT_ERROR,
    }
}
