//! Error types for Chat.ai
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Chat.ai operations
///
/// Covers configuration loading, credential resolution, completion calls
/// against the provider, and session management in the web host.
#[derive(Error, Debug)]
pub enum ChataiError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Authentication errors (e.g., 401 Unauthorized)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// No credential could be resolved for the named key
    #[error("API key not configured: {0}")]
    MissingCredentials(String),

    /// A submission was attempted with no text
    #[error("Message text cannot be empty")]
    EmptyMessage,

    /// The requested chat session does not exist (or has ended)
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A reply is still pending for the session
    #[error("Session {0} is awaiting a reply")]
    SessionBusy(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Chat.ai operations
///
/// Uses `anyhow::Error` so callers can attach context while still being able
/// to downcast to [`ChataiError`] where the variant matters (HTTP status
/// mapping, startup failures).
pub type Result<T> = anyhow::Result<T>;
