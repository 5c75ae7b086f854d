//! API error types for the helpdesk client.
//!
//! Every failed request is reduced to one of these variants. When the server
//! supplies a `message` in its error body, that message is carried verbatim
//! and becomes the error's display text, so callers never parse bodies.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the helpdesk backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: missing or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// 403: authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// 404: resource not found.
    #[error("{0}")]
    NotFound(String),

    /// 400/409/422: validation or business rule rejected by the server.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Any other non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Network or HTTP transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body did not match the expected shape.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A request that was refused before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status and the message to show.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            code @ (400 | 409 | 422) => ApiError::Rejected {
                status: code,
                message,
            },
            code => ApiError::Server {
                status: code,
                message,
            },
        }
    }

    /// Fallback message used when the server body carries none.
    pub fn generic_message(status: StatusCode) -> String {
        format!("Request failed with status code {}", status.as_u16())
    }

    /// The HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) | ApiError::InvalidRequest(_) | ApiError::InvalidUrl(_) => None,
        }
    }

    /// Whether this is a 401 or 403.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::Forbidden(_))
    }

    /// The normalized message for display and state storage.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
