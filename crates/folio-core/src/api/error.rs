use std::fmt;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(ErrorReply),

    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorReply),

    #[error("Resource not found: {0}")]
    NotFound(ErrorReply),

    #[error("Request rejected ({status}): {reply}")]
    Rejected { status: u16, reply: ErrorReply },

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(ErrorReply),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape used by the backend: `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Body of a non-2xx response.
///
/// `message` is only set when the backend sent a JSON `{"message": ...}`;
/// `body` keeps the raw (truncated) text for display and logs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorReply {
    pub message: Option<String>,
    pub body: String,
}

impl ErrorReply {
    /// Reply carrying a server message
    pub fn with_message(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            body: message.to_string(),
        }
    }

    /// Parse a response body, keeping the `message` field when there is one.
    pub fn parse(body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty());
        Self {
            message,
            body: truncate_body(body),
        }
    }
}

impl fmt::Display for ErrorReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(ref message) => f.write_str(message),
            None => f.write_str(&self.body),
        }
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let reply = ErrorReply::parse(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(reply),
            403 => ApiError::AccessDenied(reply),
            404 => ApiError::NotFound(reply),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(reply),
            code @ 400..=499 => ApiError::Rejected { status: code, reply },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, reply)),
        }
    }

    /// The message the server attached to a rejection, if it sent one.
    ///
    /// Only a JSON `message` field counts; a raw body (an HTML error page
    /// from a proxy, say) is never returned here.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(reply)
            | ApiError::AccessDenied(reply)
            | ApiError::NotFound(reply)
            | ApiError::ServerError(reply)
            | ApiError::Rejected { reply, .. } => reply.message.as_deref(),
            _ => None,
        }
    }

    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_extracts_server_message() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"message":"Invalid email or password"}"#,
        );
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert_eq!(err.server_message(), Some("Invalid email or password"));
    }

    #[test]
    fn test_non_json_body_is_not_a_server_message() {
        let page = "<html><head><title>502 Bad Gateway</title></head><body>nginx</body></html>";
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, page);
        assert!(matches!(err, ApiError::ServerError(_)));
        assert_eq!(err.server_message(), None);
        // Still visible for logs
        assert!(err.to_string().contains("502 Bad Gateway"));
    }

    #[test]
    fn test_json_without_message_is_not_a_server_message() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"success":false}"#);
        assert_eq!(err.server_message(), None);

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message":"  "}"#);
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_from_status_empty_body_has_no_message() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_from_status_other_client_errors() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"Email is required"}"#);
        match err {
            ApiError::Rejected { status, ref reply } => {
                assert_eq!(status, 400);
                assert_eq!(reply.message.as_deref(), Some("Email is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.contains("truncated, 520 total bytes"));
    }
}
