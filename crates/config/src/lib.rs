//! Configuration loading, validation, and management for ThreadGPT.
//!
//! Loads configuration from `~/.threadgpt/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.threadgpt/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model used when summarization is off
    #[serde(default = "default_model")]
    pub default_model: String,

    /// HTTP timeout for completion requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// History summarization
    #[serde(default)]
    pub summarize: SummarizeConfig,

    /// Discord connection
    #[serde(default)]
    pub discord: DiscordConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_request_timeout_secs() -> u64 {
    120
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
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("summarize", &self.summarize)
            .field("discord", &self.discord)
            .finish()
    }
}

/// Settings for compressing older history into a summary turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeConfig {
    /// Whether replies go through the summarizing pipeline
    #[serde(default)]
    pub enabled: bool,

    /// Model that answers once the prompt has been summarized
    #[serde(default = "default_summarize_model")]
    pub model: String,

    /// Lightweight model that writes the summary
    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    /// Most recent messages kept verbatim after the summary
    #[serde(default = "default_messages_to_keep")]
    pub messages_to_keep: usize,

    /// Only the last N messages are considered at all
    #[serde(default = "default_messages_to_summarize")]
    pub messages_to_summarize: usize,
}

fn default_summarize_model() -> String {
    "gpt-4".into()
}
fn default_summary_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_messages_to_keep() -> usize {
    2
}
fn default_messages_to_summarize() -> usize {
    10
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_summarize_model(),
            summary_model: default_summary_model(),
            messages_to_keep: default_messages_to_keep(),
            messages_to_summarize: default_messages_to_summarize(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token from the Discord Developer Portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    #[serde(default = "default_discord_api_url")]
    pub api_url: String,

    /// Replies longer than this are split into several messages
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// How many thread messages to fetch as history
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

fn default_discord_api_url() -> String {
    "https://discord.com/api/v10".into()
}
fn default_max_message_chars() -> usize {
    1500
}
fn default_history_limit() -> u32 {
    100
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_url: default_discord_api_url(),
            max_message_chars: default_max_message_chars(),
            history_limit: default_history_limit(),
        }
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("api_url", &self.api_url)
            .field("max_message_chars", &self.max_message_chars)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.threadgpt/config.toml).
    ///
    /// Also checks environment variables:
    /// - `THREADGPT_API_KEY`, then `OPENAI_API_KEY` (when no key is in the file)
    /// - `DISCORD_BOT_TOKEN`
    /// - `THREADGPT_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
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

    /// Apply environment overrides, reading variables through `var`.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = var("THREADGPT_API_KEY").or_else(|| var("OPENAI_API_KEY"));
        }

        if let Some(token) = var("DISCORD_BOT_TOKEN") {
            self.discord.bot_token = Some(token);
        }

        if let Some(model) = var("THREADGPT_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".threadgpt")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        if self.summarize.messages_to_summarize == 0 {
            return Err(ConfigError::ValidationError(
                "summarize.messages_to_summarize must be at least 1".into(),
            ));
        }

        // Discord rejects message content over 2000 characters
        if !(1..=2000).contains(&self.discord.max_message_chars) {
            return Err(ConfigError::ValidationError(
                "discord.max_message_chars must be between 1 and 2000".into(),
            ));
        }

        if !(1..=100).contains(&self.discord.history_limit) {
            return Err(ConfigError::ValidationError(
                "discord.history_limit must be between 1 and 100".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Write the default config to `path`, creating parent directories.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, Self::default_toml()).map_err(write_err)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            default_model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            summarize: SummarizeConfig::default(),
            discord: DiscordConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
