//! Cohere chat provider
//!
//! This module implements [`CompletionClient`] against Cohere's `/v1/chat`
//! endpoint: the newest message travels in `message`, earlier turns in
//! `chat_history`, and the reply comes back as `text`.

use crate::config::ProviderConfig;
use crate::error::{ChataiError, Result};
use crate::providers::{CompletionClient, CompletionRequest, CompletionResponse, TokenUsage};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const CHAT_PATH: &str = "/v1/chat";

/// Response body from `/v1/chat`
#[derive(Debug, Deserialize)]
struct CohereChatResponse {
    text: String,
    #[serde(default)]
    generation_id: Option<String>,
    #[serde(default)]
    meta: Option<CohereMeta>,
}

#[derive(Debug, Deserialize)]
struct CohereMeta {
    #[serde(default)]
    billed_units: Option<CohereBilledUnits>,
}

#[derive(Debug, Deserialize)]
struct CohereBilledUnits {
    #[serde(default)]
    input_tokens: f64,
    #[serde(default)]
    output_tokens: f64,
}

/// Error body returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct CohereErrorBody {
    message: String,
}

/// Cohere API client
///
/// # Examples
///
/// ```
/// use chatai::config::ProviderConfig;
/// use chatai::providers::CohereClient;
///
/// let client = CohereClient::new(&ProviderConfig::default(), "my-api-key");
/// assert!(client.is_ok());
/// ```
pub struct CohereClient {
    client: Client,
    api_key: String,
    url: String,
}

impl CohereClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns [`ChataiError::MissingCredentials`] for a blank key and
    /// [`ChataiError::Provider`] if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ChataiError::MissingCredentials(config.api_key_name.clone()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("chatai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChataiError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        let url = format!("{}{}", config.api_base.trim_end_matches('/'), CHAT_PATH);

        tracing::info!("Initialized Cohere client: url={}, model={}", url, config.model);

        Ok(Self {
            client,
            api_key,
            url,
        })
    }

    /// Full chat endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionClient for CohereClient {
    async fn chat(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Cohere request failed: {}", e);
                ChataiError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<CohereErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            tracing::error!("Cohere returned error {}: {}", status, detail);

            if status == StatusCode::UNAUTHORIZED {
                return Err(ChataiError::Authentication(detail).into());
            }
            return Err(ChataiError::Provider(format!(
                "Cohere returned error {}: {}",
                status, detail
            ))
            .into());
        }

        let bytes = response.bytes().await.map_err(ChataiError::Http)?;
        let body: CohereChatResponse = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Failed to parse Cohere response: {}", e);
            ChataiError::Serialization(e)
        })?;

        let usage = body
            .meta
            .and_then(|m| m.billed_units)
            .map(|units| TokenUsage {
                input_tokens: units.input_tokens as u64,
                output_tokens: units.output_tokens as u64,
            });

        Ok(CompletionResponse {
            text: body.text,
            generation_id: body.generation_id,
            usage,
        })
    }

    fn name(&self) -> &str {
        "cohere"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_missing_credentials() {
        let result = CohereClient::new(&ProviderConfig::default(), "  ");
        let err = result.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ChataiError>(),
            Some(ChataiError::MissingCredentials(name)) if name == "COHERE_API_KEY"
        ));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let config = ProviderConfig {
            api_base: "http://localhost:9999/".to_string(),
            ..ProviderConfig::default()
        };
        let client = CohereClient::new(&config, "key").unwrap();
        assert_eq!(client.url(), "http://localhost:9999/v1/chat");
    }

    #[test]
    fn test_parse_chat_response_with_meta() {
        let body = r#"{
            "text": "Hi there!",
            "generation_id": "gen-1",
            "meta": {"billed_units": {"input_tokens": 12, "output_tokens": 4}}
        }"#;
        let parsed: CohereChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text, "Hi there!");
        assert_eq!(parsed.generation_id.as_deref(), Some("gen-1"));
        let units = parsed.meta.unwrap().billed_units.unwrap();
        assert_eq!(units.input_tokens as u64, 12);
    }

    #[test]
    fn test_parse_minimal_chat_response() {
        let parsed: CohereChatResponse = serde_json::from_str(r#"{"text": "ok"}"#).unwrap();
        assert_eq!(parsed.text, "ok");
        assert!(parsed.meta.is_none());
    }
}
