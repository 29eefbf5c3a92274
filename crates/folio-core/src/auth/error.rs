use thiserror::Error;

use crate::api::ApiError;

/// Generic message used when a login fails without a usable explanation
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Error, Debug)]
pub enum AuthError {
    /// Rejected locally, no request was sent
    #[error("{0}")]
    Validation(String),

    /// The server refused the credentials
    #[error("{0}")]
    Rejected(String),

    /// Refresh or profile re-fetch failed; the session was signed out
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error(transparent)]
    Transport(ApiError),

    /// A newer login, refresh or logout started while this one was in flight
    #[error("Operation superseded by a newer session change")]
    Superseded,
}

impl AuthError {
    /// Classify a failed login call.
    ///
    /// Server messages win; transport failures keep their own text;
    /// anything else becomes the generic login failure message.
    pub(crate) fn from_login(err: ApiError) -> Self {
        if let Some(message) = err.server_message() {
            return AuthError::Rejected(message.to_string());
        }
        if err.is_transport() {
            return AuthError::Transport(err);
        }
        AuthError::Rejected(LOGIN_FAILED.to_string())
    }

    pub(crate) fn from_refresh(err: ApiError) -> Self {
        if err.is_transport() {
            AuthError::Transport(err)
        } else {
            AuthError::SessionExpired(err.to_string())
        }
    }
}
