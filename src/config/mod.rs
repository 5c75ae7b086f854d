//! Configuration management for the helpdesk client.
//!
//! This module handles loading and saving the user's configuration file,
//! a TOML document at `<config_dir>/helpdesk-tui/config.toml`. A missing
//! file yields the defaults.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use settings::{SessionStorage, Settings};

/// Errors from loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not determine the platform config directory.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Failed to create the config directory.
    #[error("failed to create config directory {path}: {source}")]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read the config file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the config file.
    #[error("failed to write config file {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The config could not be serialized.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A setting has an unusable value.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application settings.
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Default location of the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("helpdesk-tui").join("config.toml"))
    }

    /// Load the config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load and validate the config from a specific path.
    ///
    /// Returns the defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

        config.settings.validate()?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save the config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.settings.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDirError {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Save the config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }
}
