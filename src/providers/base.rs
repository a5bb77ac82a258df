//! Completion client trait and request/response types
//!
//! This module defines the [`CompletionClient`] trait implemented by every
//! chat backend, along with the provider-shaped request and response types
//! that cross that seam.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a chat-history entry, in the provider's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiRole {
    Chatbot,
    User,
    System,
}

impl fmt::Display for ApiRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chatbot => write!(f, "Chatbot"),
            Self::User => write!(f, "User"),
            Self::System => write!(f, "System"),
        }
    }
}

/// One prior turn sent as context with a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: ApiRole,
    pub message: String,
}

impl HistoryEntry {
    pub fn new(role: ApiRole, message: impl Into<String>) -> Self {
        Self {
            role,
            message: message.into(),
        }
    }
}

/// A single completion call
///
/// `message` is the newest user input; `chat_history` holds every earlier
/// turn in order and never includes `message` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub message: String,
    pub chat_history: Vec<HistoryEntry>,
    pub model: String,
    pub temperature: f32,
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Reply to a completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated reply text
    pub text: String,

    /// Provider-assigned identifier of this generation, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<String>,

    /// Billed token counts, if the provider reported them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Response carrying only reply text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generation_id: None,
            usage: None,
        }
    }
}

/// A backend able to answer chat completion calls
///
/// Implementors own transport, authentication, and serialization; callers
/// only see [`CompletionRequest`] and [`CompletionResponse`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform one completion call
    ///
    /// # Errors
    ///
    /// Returns error if the call fails for any reason (transport, status,
    /// malformed body). No retry is attempted.
    async fn chat(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Short backend name used in logs and metric labels
    fn name(&self) -> &str;
}
