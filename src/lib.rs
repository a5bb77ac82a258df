//! Chat.ai - browser chat front-end library
//!
//! This library provides the pieces of the Chat.ai front-end: the
//! per-client conversation session, the completion client for the Cohere
//! chat API, credential lookup, and the web host that serves the chat page.
//!
//! # Architecture
//!
//! - `session`: Message log, history projection, usage counter
//! - `providers`: Completion client trait and implementations (Cohere, fake)
//! - `credentials`: API key lookup (keyring, then environment)
//! - `server`: axum web host and per-client session store
//! - `commands`: CLI command handlers (serve, chat, auth)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chatai::providers::FakeCompletionClient;
//! use chatai::session::{ChatSession, CompletionSettings};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = Arc::new(FakeCompletionClient::new());
//! let mut session = ChatSession::new(client, CompletionSettings::default(), "How can I help you today?");
//! let reply = session.submit_message("Hello").await?;
//! assert_eq!(reply, "echo: Hello");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod providers;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{ChataiError, Result};
pub use session::{ChatSession, Message, Role};
