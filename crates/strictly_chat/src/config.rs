//! Bot configuration.

use crate::session::ParticipantId;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable overriding `webhook_url`.
pub const WEBHOOK_URL_ENV: &str = "STRICTLY_CHAT_WEBHOOK_URL";

/// Environment variable overriding `webhook_token`.
pub const WEBHOOK_TOKEN_ENV: &str = "STRICTLY_CHAT_WEBHOOK_TOKEN";

/// Configuration for the chat bot.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct BotConfig {
    /// Command that starts a game.
    #[serde(default = "default_command")]
    command: String,

    /// Prefix commands are typed with.
    #[serde(default = "default_prefix")]
    command_prefix: String,

    /// Evict sessions idle for longer than this many seconds. Unset keeps
    /// sessions until the process exits.
    #[serde(default)]
    session_ttl_secs: Option<u64>,

    /// Chat platform endpoint messages are posted to.
    #[serde(default)]
    webhook_url: Option<String>,

    /// Bearer token for the webhook.
    #[serde(default)]
    webhook_token: Option<String>,

    /// SQLite participant directory. When unset, names come from
    /// `participants`.
    #[serde(default)]
    db_path: Option<String>,

    /// Upper-case the first side's pieces and lower-case the second's.
    #[serde(default)]
    case_by_side: bool,

    /// Participant id to display name.
    #[serde(default)]
    participants: HashMap<ParticipantId, String>,
}

#[instrument]
fn default_command() -> String {
    "tictactoe".to_string()
}

#[instrument]
fn default_prefix() -> String {
    "!".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            command_prefix: default_prefix(),
            session_ttl_secs: None,
            webhook_url: None,
            webhook_token: None,
            db_path: None,
            case_by_side: false,
            participants: HashMap::new(),
        }
    }
}

impl BotConfig {
    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero `session_ttl_secs`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl_secs == Some(0) {
            return Err(ConfigError::new(
                "session_ttl_secs must be at least 1; omit it to keep sessions".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(command = %config.command, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise, then applies
    /// environment overrides.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Applies `STRICTLY_CHAT_WEBHOOK_URL` and `STRICTLY_CHAT_WEBHOOK_TOKEN`.
    #[instrument(skip(self))]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            debug!("Webhook URL taken from environment");
            self.webhook_url = Some(url);
        }
        if let Ok(token) = std::env::var(WEBHOOK_TOKEN_ENV) {
            debug!("Webhook token taken from environment");
            self.webhook_token = Some(token);
        }
        self
    }

    /// Idle time after which a session is evicted, if configured. Zero
    /// counts as unset.
    pub fn session_ttl(&self) -> Option<chrono::Duration> {
        self.session_ttl_secs
            .filter(|secs| *secs > 0)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::Duration::try_seconds)
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
