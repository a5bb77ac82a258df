//! Provider module for Chat.ai
//!
//! This module contains the completion client abstraction, the Cohere
//! implementation, and a scripted fake for tests.

pub mod base;
pub mod cohere;
pub mod fake;

pub use base::{
    ApiRole, CompletionClient, CompletionRequest, CompletionResponse, HistoryEntry, TokenUsage,
};
pub use cohere::CohereClient;
pub use fake::FakeCompletionClient;

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::credentials::{resolve_api_key, SecretStore};
use crate::error::Result;

/// Resolve the API key and build the process-wide completion client
///
/// This is the one-time startup step; any error here is meant to stop the
/// process before a session can be created.
///
/// # Errors
///
/// Returns error if no credential is configured or the client cannot be built
pub fn create_client(
    config: &ProviderConfig,
    secrets: &dyn SecretStore,
) -> Result<Arc<dyn CompletionClient>> {
    let api_key = resolve_api_key(secrets, &config.api_key_name)?;
    Ok(Arc::new(CohereClient::new(config, api_key)?))
}
