//! Anthropic Messages API model client.
//!
//! One user message in, the concatenated text blocks out. No streaming and
//! no system prompt: belief and divergence prompts are self-contained.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::models::ModelConfig;
use crate::domain::ports::{ModelClient, ModelError};

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// HTTP client for the Anthropic Messages API.
pub struct AnthropicModelClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
    timeout_secs: u64,
}

impl AnthropicModelClient {
    /// Build a client from config. Fails when no API key is configured or
    /// present in `ANTHROPIC_API_KEY`.
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let api_key = config
            .resolved_api_key()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.name.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_send_error(&self, err: &reqwest::Error) -> ModelError {
        if err.is_timeout() {
            ModelError::Timeout(self.timeout_secs)
        } else if err.is_connect() {
            ModelError::Unavailable(err.to_string())
        } else {
            ModelError::RequestFailed(err.to_string())
        }
    }
}

fn map_status(status: StatusCode, body: &str) -> ModelError {
    let message = format!("API error {status}: {body}");
    match status.as_u16() {
        429 => ModelError::RateLimited(message),
        408 | 500..=599 => ModelError::Unavailable(message),
        _ => ModelError::RequestFailed(message),
    }
}

#[async_trait]
impl ModelClient for AnthropicModelClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let text = result
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(ModelError::InvalidResponse("response had no text blocks".to_string()));
        }

        debug!(model = %self.model, chars = text.len(), "model replied");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn config(base_url: String) -> ModelConfig {
        ModelConfig {
            base_url,
            api_key: Some("test-api-key".to_string()),
            name: "test-model".to_string(),
            max_tokens: 64,
            ..ModelConfig::default()
        }
    }

    fn reply_body(blocks: serde_json::Value) -> String {
        serde_json::json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": blocks,
            "model": "test-model",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 3}
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_ask_sends_headers_and_joins_text_blocks() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-api-key")
            .match_header("anthropic-version", API_VERSION)
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "test-model",
                "max_tokens": 64,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body(serde_json::json!([
                {"type": "text", "text": "{\"a\": 1}"},
                {"type": "tool_use", "id": "t", "name": "n", "input": {}},
                {"type": "text", "text": "done"}
            ])))
            .create_async()
            .await;

        let client = AnthropicModelClient::new(&config(server.url())).unwrap();
        let text = client.ask("hello").await.unwrap();

        assert_eq!(text, "{\"a\": 1}\ndone");
        mock.assert_async().await;
    }

    async fn ask_against_status(status: usize) -> ModelError {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(status)
            .with_body("error body")
            .create_async()
            .await;
        let client = AnthropicModelClient::new(&config(server.url())).unwrap();
        client.ask("x").await.unwrap_err()
    }

    #[tokio::test]
    async fn test_status_codes_map_to_model_errors() {
        assert!(matches!(ask_against_status(429).await, ModelError::RateLimited(_)));
        assert!(matches!(ask_against_status(529).await, ModelError::Unavailable(_)));
        assert!(matches!(ask_against_status(500).await, ModelError::Unavailable(_)));

        let err = ask_against_status(400).await;
        assert!(matches!(err, ModelError::RequestFailed(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_response_without_text_is_invalid() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body(serde_json::json!([])))
            .create_async()
            .await;

        let client = AnthropicModelClient::new(&config(server.url())).unwrap();
        assert!(matches!(client.ask("x").await, Err(ModelError::InvalidResponse(_))));
    }

    #[test]
    fn test_missing_api_key_is_not_configured() {
        temp_env::with_var_unset("ANTHROPIC_API_KEY", || {
            let config = ModelConfig::default();
            assert!(matches!(
                AnthropicModelClient::new(&config),
                Err(ModelError::NotConfigured(_))
            ));
        });
    }
}
