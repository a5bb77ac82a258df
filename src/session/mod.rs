//! Conversation session module for Chat.ai
//!
//! This module contains the per-client conversation state: the message log,
//! the history projection sent to the provider, the usage counter, and the
//! completion metrics.

pub mod conversation;
pub mod history;
pub mod message;
pub mod metrics;
pub mod usage;

pub use conversation::{ChatSession, CompletionSettings, ERROR_PREFIX};
pub use history::project_history;
pub use message::{Message, Role};
pub use usage::UsageStats;
