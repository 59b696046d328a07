//! Configuration loading and validation for Colloquy.
//!
//! Loads configuration from `colloquy.toml` in the working directory (a
//! `colloquy.dev.toml` next to it takes precedence when present), with
//! environment variable overrides for the remote endpoint and credentials.
//! Validates all settings at load time; the binary refuses to start the
//! session loop on any failure here.

use std::path::{Path, PathBuf};

use colloquy_core::GenerationParams;
use serde::{Deserialize, Serialize};

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "colloquy.toml";

/// Development override; wins over [`CONFIG_FILE`] when both exist.
pub const DEV_CONFIG_FILE: &str = "colloquy.dev.toml";

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote completion service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key for the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Deployment (model) identifier at the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    /// Maximum number of history entries kept between turns
    #[serde(default = "default_history_length")]
    pub history_length: usize,

    /// Cap on generated tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// User-facing prompt strings
    #[serde(default)]
    pub messages: UiMessages,

    /// System preamble source
    #[serde(default)]
    pub preamble: PreambleConfig,
}

fn default_history_length() -> usize {
    10
}
fn default_max_tokens() -> u32 {
    150
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    1.0
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("deployment", &self.deployment)
            .field("history_length", &self.history_length)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("messages", &self.messages)
            .field("preamble", &self.preamble)
            .finish()
    }
}

/// User-facing strings printed by the session loop. Opaque to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiMessages {
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_prompt")]
    pub prompt: String,

    #[serde(default = "default_empty_input")]
    pub empty_input: String,

    #[serde(default = "default_exit")]
    pub exit: String,
}

fn default_greeting() -> String {
    "Welcome to Colloquy. Ask me anything.".into()
}
fn default_prompt() -> String {
    "You > ".into()
}
fn default_empty_input() -> String {
    "I didn't catch that. Please type a message.".into()
}
fn default_exit() -> String {
    "Goodbye!".into()
}

impl Default for UiMessages {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            prompt: default_prompt(),
            empty_input: default_empty_input(),
            exit: default_exit(),
        }
    }
}

/// Where the system preamble comes from.
///
/// An inline `text` override wins; otherwise `path` is read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreambleConfig {
    /// Override the preamble entirely (skips file loading)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// File to load the preamble from
    #[serde(default = "default_preamble_path")]
    pub path: PathBuf,
}

fn default_preamble_path() -> PathBuf {
    PathBuf::from("preamble.txt")
}

impl Default for PreambleConfig {
    fn default() -> Self {
        Self {
            text: None,
            path: default_preamble_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the working directory.
    ///
    /// Resolution order: `colloquy.dev.toml` if present, else
    /// `colloquy.toml`, else built-in defaults. Environment variables
    /// merged afterwards:
    /// - `COLLOQUY_ENDPOINT`
    /// - `COLLOQUY_API_KEY` (falls back to `OPENAI_API_KEY`)
    /// - `COLLOQUY_DEPLOYMENT`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_override(None)
    }

    /// Load configuration, optionally from an explicit path (`--config`).
    ///
    /// An explicitly named file must exist: a typo'd `--config` path is a
    /// fatal startup error, never a silent fall-through to defaults. Only
    /// the implicit working-directory resolution tolerates absence.
    pub fn load_with_override(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::load_required(p)?,
            None => Self::load_from_dir(Path::new("."))?,
        };
        config.merge_env();
        Ok(config)
    }

    /// Load from a directory, preferring the dev file when present.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let dev = dir.join(DEV_CONFIG_FILE);
        if dev.exists() {
            Self::load_from(&dev)
        } else {
            Self::load_from(&dir.join(CONFIG_FILE))
        }
    }

    fn load_required(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                reason: "file not found".into(),
            });
        }
        Self::load_from(path)
    }

    /// Merge environment variable overrides into this config.
    ///
    /// `COLLOQUY_ENDPOINT` and `COLLOQUY_DEPLOYMENT` always win; the API
    /// key is only filled from `COLLOQUY_API_KEY` (then `OPENAI_API_KEY`)
    /// when the file did not set one.
    fn merge_env(&mut self) {
        if let Ok(endpoint) = std::env::var("COLLOQUY_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("COLLOQUY_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }
        if let Ok(deployment) = std::env::var("COLLOQUY_DEPLOYMENT") {
            self.deployment = Some(deployment);
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_length == 0 {
            return Err(ConfigError::ValidationError(
                "history_length must be at least 1".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::ValidationError(
                "top_p must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }

    /// Check that the remote service is fully identified.
    ///
    /// Called by the binary after env merging, before the loop starts.
    pub fn require_remote(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("endpoint", &self.endpoint),
            ("api_key", &self.api_key),
            ("deployment", &self.deployment),
        ] {
            if value.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::ValidationError(format!(
                    "{field} is not set (config file or environment)"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the system preamble text.
    ///
    /// Inline text wins over the file path. An unreadable file is fatal.
    pub fn resolve_preamble(&self) -> Result<String, ConfigError> {
        if let Some(text) = &self.preamble.text {
            return Ok(text.clone());
        }
        std::fs::read_to_string(&self.preamble.path).map_err(|e| ConfigError::ReadError {
            path: self.preamble.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Build the per-call generation parameters from this config.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens,
            candidate_count: 1,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            history_length: default_history_length(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            messages: UiMessages::default(),
            preamble: PreambleConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}
