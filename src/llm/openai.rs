//! OpenAI-compatible chat-completions client.
//!
//! One request per call, no retries. The credential is injected through
//! [`CompletionConfig`] at construction time; a missing credential puts the
//! client in a well-defined disabled state that behaves exactly like a network
//! failure at the [`CompletionBackend`] boundary.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::{Completion, CompletionBackend, GenerationParams, error::CompletionError};

/// Configuration for the completion client.
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    /// API key for authentication. `None` disables the client.
    pub api_key: Option<String>,
    /// Base URL (default: https://api.openai.com)
    pub base_url: String,
    /// Model to request (default: gpt-4o-mini)
    pub model: String,
    /// Upper bound on one attempt, connection included.
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Request structure for chat completions
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    pub stream: bool,
}

/// A message in the chat format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from chat completions
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reqwest-backed completion client.
pub struct OpenAiCompletion {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl OpenAiCompletion {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// A client with no credential: every attempt reports `Unavailable`.
    pub fn disabled() -> Self {
        Self::new(CompletionConfig::default())
    }

    pub fn is_disabled(&self) -> bool {
        self.config.api_key.is_none()
    }

    async fn call(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(CompletionError::Disabled)?;

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
            top_p: params.top_p,
            stream: false,
        };

        let attempt = async {
            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(CompletionError::Status { status, body });
            }

            let parsed: ChatResponse = response.json().await?;
            parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| CompletionError::InvalidResponse("no choices in response".to_string()))
        };

        match tokio::time::timeout(self.config.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout(self.config.timeout)),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompletion {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Completion {
        match self.call(prompt, params).await {
            Ok(text) => Completion::Produced(text),
            Err(CompletionError::Disabled) => {
                log::debug!("completion skipped: no credential configured");
                Completion::Unavailable
            }
            Err(err) => {
                log::warn!("completion attempt failed: {}", err);
                Completion::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CompletionConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_request_serialization_skips_unset_fields() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: Some(0.7),
            max_tokens: None,
            top_p: None,
            stream: false,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("temperature"));
        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("top_p"));
        assert!(json.contains("\"stream\":false"));
    }

    #[tokio::test]
    async fn test_disabled_client_is_unavailable_without_network() {
        let client = OpenAiCompletion::disabled();
        assert!(client.is_disabled());

        let result = client
            .complete("prompt", &GenerationParams::default())
            .await;
        assert_eq!(result, Completion::Unavailable);
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }
}
