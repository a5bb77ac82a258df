//! Configuration management for Chat.ai
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChataiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Chat.ai
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// HTTP server settings for the browser front-end
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat presentation settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Cohere provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL (useful for tests and local mocks)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier sent with every completion call
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature sent with every completion call
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP request timeout for completion calls (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Name of the credential, used both as the keyring entry and as the
    /// fallback environment variable
    #[serde(default = "default_api_key_name")]
    pub api_key_name: String,
}

fn default_api_base() -> String {
    "https://api.cohere.com".to_string()
}

fn default_model() -> String {
    "command-r".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_api_key_name() -> String {
    "COHERE_API_KEY".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            api_key_name: default_api_key_name(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds without a request after which a session is discarded (0 keeps
    /// sessions until they are deleted)
    #[serde(default = "default_session_idle_timeout_seconds")]
    pub session_idle_timeout_seconds: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_session_idle_timeout_seconds() -> u64 {
    1800
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_timeout_seconds: default_session_idle_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Idle timeout for web sessions, `None` when eviction is disabled
    pub fn session_idle_timeout(&self) -> Option<Duration> {
        match self.session_idle_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Chat presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Page title shown above the conversation
    #[serde(default = "default_title")]
    pub title: String,

    /// Synthetic assistant message that opens every session
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Placeholder text of the message input
    #[serde(default = "default_input_placeholder")]
    pub input_placeholder: String,
}

fn default_title() -> String {
    "🤖 Chat.ai".to_string()
}

fn default_greeting() -> String {
    "How can I help you today?".to_string()
}

fn default_input_placeholder() -> String {
    "Type your message...".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            greeting: default_greeting(),
            input_placeholder: default_input_placeholder(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(ChataiError::Io)?;
        let config = serde_yaml::from_str(&contents).map_err(ChataiError::Yaml)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("CHATAI_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(model) = std::env::var("CHATAI_MODEL") {
            self.provider.model = model;
        }

        if let Ok(temperature) = std::env::var("CHATAI_TEMPERATURE") {
            match temperature.parse() {
                Ok(value) => self.provider.temperature = value,
                Err(_) => tracing::warn!("Invalid CHATAI_TEMPERATURE: {}", temperature),
            }
        }

        if let Ok(timeout) = std::env::var("CHATAI_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.provider.timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid CHATAI_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(host) = std::env::var("CHATAI_HOST") {
            tracing::debug!(host = %host, "Env override: CHATAI_HOST");
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("CHATAI_PORT") {
            match port.parse() {
                Ok(value) => self.server.port = value,
                Err(_) => tracing::warn!("Invalid CHATAI_PORT: {}", port),
            }
        }

        if let Ok(idle) = std::env::var("CHATAI_SESSION_IDLE_TIMEOUT_SECONDS") {
            match idle.parse() {
                Ok(value) => self.server.session_idle_timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid CHATAI_SESSION_IDLE_TIMEOUT_SECONDS: {}", idle),
            }
        }

        if let Ok(greeting) = std::env::var("CHATAI_GREETING") {
            self.chat.greeting = greeting;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        match &cli.command {
            crate::cli::Commands::Serve { host, port } => {
                if let Some(host) = host {
                    self.server.host = host.clone();
                }
                if let Some(port) = port {
                    self.server.port = *port;
                }
            }
            crate::cli::Commands::Chat { model: Some(model) } => {
                self.provider.model = model.clone();
            }
            _ => {}
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_base.trim().is_empty() {
            return Err(ChataiError::Config("provider.api_base cannot be empty".to_string()).into());
        }

        if self.provider.model.trim().is_empty() {
            return Err(ChataiError::Config("provider.model cannot be empty".to_string()).into());
        }

        if !(0.0..=5.0).contains(&self.provider.temperature) {
            return Err(ChataiError::Config(format!(
                "provider.temperature must be between 0.0 and 5.0, got {}",
                self.provider.temperature
            ))
            .into());
        }

        if self.provider.timeout_seconds == 0 {
            return Err(ChataiError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.provider.api_key_name.trim().is_empty() {
            return Err(
                ChataiError::Config("provider.api_key_name cannot be empty".to_string()).into(),
            );
        }

        if self.server.port == 0 {
            return Err(
                ChataiError::Config("server.port must be greater than 0".to_string()).into(),
            );
        }

        if self.chat.greeting.trim().is_empty() {
            return Err(ChataiError::Config("chat.greeting cannot be empty".to_string()).into());
        }

        Ok(())
    }
}
