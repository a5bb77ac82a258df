//! In-process scripted completion client for tests
//!
//! [`FakeCompletionClient`] answers calls from a queue of scripted outcomes
//! and records every request it receives, so session and server tests can
//! run without network access.
//!
//! # Example
//!
//! ```
//! use chatai::providers::{CompletionClient, CompletionRequest, FakeCompletionClient};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = FakeCompletionClient::new();
//! client.push_reply("Hi there!");
//! client.push_error("timeout");
//!
//! let request = CompletionRequest {
//!     message: "Hello".to_string(),
//!     chat_history: Vec::new(),
//!     model: "command-r".to_string(),
//!     temperature: 0.7,
//! };
//! assert_eq!(client.chat(&request).await.unwrap().text, "Hi there!");
//! assert_eq!(client.chat(&request).await.unwrap_err().to_string(), "timeout");
//! assert_eq!(client.requests().len(), 2);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::{CompletionClient, CompletionRequest, CompletionResponse};

enum Scripted {
    Reply(String),
    Error(String),
}

/// Scripted [`CompletionClient`]
///
/// When the script runs dry, calls echo the request message back as
/// `echo: <message>`.
#[derive(Default)]
pub struct FakeCompletionClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl FakeCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call wait `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply
    pub fn push_reply(&self, text: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Scripted::Reply(text.into()));
        }
    }

    /// Queue a failing call whose error displays as `description`
    pub fn push_error(&self, description: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Scripted::Error(description.into()));
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn chat(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Scripted::Reply(text)) => Ok(CompletionResponse::text(text)),
            Some(Scripted::Error(description)) => Err(anyhow::anyhow!(description)),
            None => Ok(CompletionResponse::text(format!("echo: {}", request.message))),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}
