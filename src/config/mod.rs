//! Configuration for rprompt.
//!
//! Settings come from three places, later ones winning:
//!
//! 1. Built-in defaults.
//! 2. An optional JSON file at `<config dir>/rprompt/config.json`.
//! 3. Command-line flags (applied by the CLI layer).
//!
//! The API key is never stored in the JSON file. It is read from the
//! `GEMINI_API_KEY` environment variable, after `~/.env` has been loaded.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::feedback::{Frames, SpinnerConfig, DEFAULT_SPINNER};

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "rprompt";
/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";
/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Default vision model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Where generated prompts can be used.
pub const DEFAULT_STUDIO_URL: &str = "https://aistudio.google.com/prompts/new_image";

/// Spinner appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinnerSettings {
    /// Named frame set (dots, line, triangle, arrow).
    #[serde(default = "default_spinner_style")]
    pub style: String,
    /// Milliseconds between frames.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_spinner_style() -> String {
    DEFAULT_SPINNER.to_string()
}

fn default_interval_ms() -> u64 {
    80
}

impl Default for SpinnerSettings {
    fn default() -> Self {
        Self {
            style: default_spinner_style(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl SpinnerSettings {
    /// Build spinner settings for the given label.
    pub fn to_spinner_config(&self, label: impl Into<String>) -> SpinnerConfig {
        SpinnerConfig::new(label)
            .frames(Frames::Named(self.style.clone()))
            .interval(Duration::from_millis(self.interval_ms))
    }
}

/// Main configuration model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpromptConfig {
    /// Vision model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the Gemini REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Page opened by `--open`.
    #[serde(default = "default_studio_url")]
    pub studio_url: String,
    /// Spinner appearance.
    #[serde(default)]
    pub spinner: SpinnerSettings,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_studio_url() -> String {
    DEFAULT_STUDIO_URL.to_string()
}

impl Default for RpromptConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            studio_url: default_studio_url(),
            spinner: SpinnerSettings::default(),
        }
    }
}

/// Error type for config operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the config file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Error parsing the config file JSON.
    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    /// No API key in the environment.
    #[error("Gemini API key not found. Set GEMINI_API_KEY in ~/.env file")]
    MissingApiKey,
}

impl RpromptConfig {
    /// Load configuration from a file, or return defaults if file doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to config file. Defaults to [`RpromptConfig::default_path`] if None.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.map(PathBuf::from).or_else(Self::default_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: RpromptConfig = serde_json::from_str(&contents)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Path of the user config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}

/// Load `~/.env` into the process environment.
///
/// Existing variables are not overridden. Returns the file that was loaded.
pub fn load_env_file() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(".env");
    if !path.exists() {
        return None;
    }
    match dotenvy::from_path(&path) {
        Ok(()) => {
            log::debug!("loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::warn!("could not load {}: {e}", path.display());
            None
        }
    }
}

/// Read the API key from the environment.
pub fn api_key() -> Result<String, ConfigError> {
    resolve_api_key(env::var(API_KEY_VAR).ok())
}

/// Validate a raw API key value.
pub fn resolve_api_key(value: Option<String>) -> Result<String, ConfigError> {
    value
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}
