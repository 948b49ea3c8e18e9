//! Minimal `POST /chat/completions` client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// A chat message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// Sampling parameters for one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Chat-completions client bound to one API key and model.
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a client pointed at the production OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock, or
    /// any OpenAI-compatible gateway).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`LlmError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let invalid = |reason: String| LlmError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| invalid(e.to_string()))?;
        let endpoint = base
            .join("chat/completions")
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs one completion and returns the first choice's text, trimmed.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Api`] on a non-2xx status.
    /// - [`LlmError::Http`] on network failure.
    /// - [`LlmError::Deserialize`] if the body does not match the expected shape.
    /// - [`LlmError::EmptyContent`] if the completion is missing or blank.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(model = %self.model, max_tokens = params.max_tokens, "requesting completion");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body).map_err(LlmError::Deserialize)?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        Ok(text)
    }

    /// Convenience wrapper for a system prompt plus one user prompt.
    ///
    /// # Errors
    ///
    /// See [`LlmClient::complete`].
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ];
        self.complete(&messages, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_chat_completions_to_versioned_base() {
        let client = LlmClient::with_base_url("k", "m", 30, "https://api.openai.com/v1").unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn request_serializes_expected_fields() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let request = CompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            max_tokens: 500,
            temperature: 0.5,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "u");
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = LlmClient::with_base_url("sk-secret", "m", 30, "http://localhost").unwrap();
        assert!(!format!("{client:?}").contains("sk-secret"));
    }
}
