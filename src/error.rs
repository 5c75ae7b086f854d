//! Centralized error types for the helpdesk client.
//!
//! This module aggregates the per-layer errors into one type with
//! user-facing messages. Server-reported API messages are shown verbatim.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;
use crate::session::SessionError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Session persistence errors.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError { .. } => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError { .. } => {
                    "Could not read configuration file. Please check it is readable.".to_string()
                }
                ConfigError::WriteError { .. } => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError { .. } => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::Network(_) => {
                    "Could not reach the helpdesk server. Please check the server URL and your connection."
                        .to_string()
                }
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from the helpdesk server.".to_string()
                }
                ApiError::InvalidUrl(_) => "Invalid server URL in configuration.".to_string(),
                other => other.message(),
            },
            AppError::Session(e) => match e {
                SessionError::Keyring(_) => {
                    "Could not access secure storage for your session.".to_string()
                }
                _ => "Could not save your session. You will need to sign in again next time."
                    .to_string(),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error is critical and requires user acknowledgment.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::Api(ApiError::Unauthorized(_))
                | AppError::Api(ApiError::Forbidden(_))
                | AppError::Terminal(_)
        )
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_api_server_message_passes_through() {
        let err = AppError::Api(ApiError::from_status(
            reqwest::StatusCode::CONFLICT,
            "Email already exists",
        ));
        assert_eq!(err.user_message(), "Email already exists");
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "tick_rate_ms must be greater than zero".to_string(),
        ));
        assert!(err.user_message().contains("tick_rate_ms"));
    }

    #[test]
    fn test_user_message_session() {
        let err = AppError::Session(SessionError::NoDataDir);
        assert!(err.user_message().contains("sign in again"));
    }

    #[test]
    fn test_is_critical() {
        assert!(AppError::Config(ConfigError::NoConfigDir).is_critical());
        assert!(AppError::Api(ApiError::Unauthorized("x".into())).is_critical());
        assert!(!AppError::Api(ApiError::NotFound("x".into())).is_critical());
        assert!(!AppError::Session(SessionError::NoDataDir).is_critical());
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert_eq!(err.user_message(), "something went wrong");
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("raw mode");
        assert_eq!(err.user_message(), "Terminal error: raw mode");
    }
}
