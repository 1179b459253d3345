use crate::directory;
use thiserror::Error;

/// Normalized failure taxonomy for the four gateway operations.
///
/// Every directory-side failure maps to exactly one kind; the distinction
/// between kinds is never lost and nothing is retried locally.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The directory returned a definite rejection with no more specific
    /// classification (duplicate user, password policy, bad code, ...).
    #[error("directory rejected the request: {code}: {message}")]
    ProviderRejected { code: String, message: String },

    /// Login attempted before the registration confirmation completed.
    /// Kept distinct so callers can route the user to the confirmation
    /// flow instead of showing a generic bad-credentials message.
    #[error("user has not completed registration confirmation")]
    UserNotConfirmed,

    /// Invalid credentials or insufficient privilege. Never conflated with
    /// [`AuthError::UserNotConfirmed`].
    #[error("not authorized")]
    NotAuthorized,

    /// Network, timeout or decode fault from the directory call, original
    /// cause attached for diagnostics.
    #[error("directory unreachable or answered unexpectedly")]
    Transport(#[source] directory::Error),
}

impl AuthError {
    pub(crate) fn from_directory(err: directory::Error) -> Self {
        match err {
            directory::Error::Api { code, message } => match code.as_str() {
                "UserNotConfirmedException" => Self::UserNotConfirmed,
                "NotAuthorizedException" => Self::NotAuthorized,
                _ => Self::ProviderRejected { code, message },
            },
            other => Self::Transport(other),
        }
    }
}
