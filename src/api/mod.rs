use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OpenAiConfig;

mod credential;
mod error;
pub mod sse;

pub use credential::{ApiKey, API_KEY_ENV};
pub use error::ApiError;
pub use sse::FragmentStream;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message in a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Chat completion request payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub stream: bool,
}

impl ChatRequest {
    /// Build a streaming request: system instructions first, then the user message
    pub fn new(settings: &OpenAiConfig, system_prompt: String, user_message: String) -> Self {
        Self {
            model: settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system_prompt,
                },
                ChatMessage {
                    role: Role::User,
                    content: user_message,
                },
            ],
            temperature: settings.temperature,
            stream: true,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize chat request")
    }
}

/// Client for an OpenAI-compatible chat completion endpoint
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(settings: &OpenAiConfig, api_key: ApiKey) -> Result<Self> {
        // Only the connect phase is bounded; a total timeout would cut long streams short
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send the request and return the response as a stream of text fragments
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream, ApiError> {
        let url = self.endpoint();

        tracing::debug!(
            "Requesting completion from {} (model {}, {} messages)",
            url,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("Completion request failed with status {}", status);
            return Err(ApiError::from_status(status, extract_error_message(&error_text)));
        }

        tracing::debug!("Completion stream opened");
        Ok(sse::fragments(response.bytes_stream()))
    }
}

/// Providers wrap failures as `{"error": {"message": ...}}`; fall back to the raw body
fn extract_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_has_system_then_user() {
        let request = ChatRequest::new(
            &OpenAiConfig::default(),
            "be brief".to_string(),
            "make it easier".to_string(),
        );

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "be brief");
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "make it easier");
        assert!(request.stream);
        assert_eq!(request.model, "gpt-4o-mini");
    }

    #[test]
    fn test_request_wire_format() {
        let request = ChatRequest::new(&OpenAiConfig::default(), "s".to_string(), "u".to_string());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["stream"], true);
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_chat_client_creation() {
        let mut settings = OpenAiConfig::default();
        settings.base_url = "http://localhost:9999/v1/".to_string();
        let key = ApiKey::resolve(Some("sk-test"), None).unwrap();

        let client = ChatClient::new(&settings, key).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Incorrect API key provided");
        assert_eq!(extract_error_message(" upstream down \n"), "upstream down");
    }
}
