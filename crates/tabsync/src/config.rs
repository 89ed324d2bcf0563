//! Replica configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ReplicaConfig::channel`].
pub const CHANNEL_ENV: &str = "TABSYNC_CHANNEL";

/// Settings shared by every replica in a process.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ReplicaConfig {
    /// Name of the broadcast channel.
    #[serde(default = "default_channel")]
    channel: String,

    /// Undelivered messages buffered per replica before the oldest are lost.
    #[serde(default = "default_capacity")]
    capacity: usize,

    /// Prefix of generated player identities.
    #[serde(default = "default_identity_prefix")]
    identity_prefix: String,

    /// Broadcast a full `state` message after every local join.
    #[serde(default)]
    announce_snapshot_on_join: bool,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_channel() -> String {
    "gameChannel".to_string()
}

fn default_capacity() -> usize {
    64
}

fn default_identity_prefix() -> String {
    "Player".to_string()
}

fn default_log_filter() -> String {
    "info,tabsync=debug".to_string()
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            capacity: default_capacity(),
            identity_prefix: default_identity_prefix(),
            announce_snapshot_on_join: false,
            log_filter: default_log_filter(),
        }
    }
}

impl ReplicaConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(channel = %config.channel, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise the defaults, then applies
    /// environment overrides.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Applies [`CHANNEL_ENV`] if set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(CHANNEL_ENV) {
            Ok(channel) if !channel.trim().is_empty() => {
                debug!(%channel, "Channel overridden from environment");
                self.with_channel(channel.trim())
            }
            _ => self,
        }
    }

    /// Replaces the channel name.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.trim().is_empty() {
            return Err(ConfigError::new("Channel name must not be empty".to_string()));
        }
        if self.capacity == 0 {
            return Err(ConfigError::new("Capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
