pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod confirm;
pub use self::confirm::confirm;

pub mod login;
pub use self::login::login;

pub mod reset_password;
pub use self::reset_password::reset_password;

// common functions for the handlers
use crate::auth::AuthError;
use axum::http::StatusCode;
use regex::Regex;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Map each normalized error kind to a response status. The distinction
/// between kinds is what the orchestrator guarantees; losing it here would
/// defeat the taxonomy.
pub(crate) fn error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::NotAuthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        AuthError::UserNotConfirmed => (
            StatusCode::FORBIDDEN,
            "User not confirmed, complete the confirmation flow first".to_string(),
        ),
        AuthError::ProviderRejected { message, .. } => {
            let body = if message.is_empty() {
                "Request rejected by the identity directory".to_string()
            } else {
                message.clone()
            };
            (StatusCode::BAD_REQUEST, body)
        }
        AuthError::Transport(_) => (
            StatusCode::BAD_GATEWAY,
            "Identity directory unavailable".to_string(),
        ),
    }
}
