//! Application settings configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Where the signed-in session is kept between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStorage {
    /// JSON file in the local data directory.
    #[default]
    File,
    /// OS keyring.
    Keyring,
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The helpdesk backend URL.
    pub base_url: String,
    /// Session persistence backend.
    pub session_storage: SessionStorage,
    /// Per-request timeout in seconds. Absent means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// UI tick interval in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            session_storage: SessionStorage::File,
            request_timeout_secs: None,
            tick_rate_ms: 100,
        }
    }
}

impl Settings {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if the base URL is not
    /// http(s), or the tick rate or timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than zero when set".to_string(),
            ));
        }

        Ok(())
    }

    /// The request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// The UI tick interval.
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}
