//! OpenAI Provider Implementation
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The API key is
//! handed to the constructor; the provider never consults the environment.
//!
//! # Examples
//!
//! ```no_run
//! use taskwright_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("sk-...", "gpt-3.5-turbo")
//!     .unwrap()
//!     .with_temperature(0.2);
//! ```

use crate::{block_on, LlmError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskwright_domain::TextCompletion;
use tracing::debug;

/// Default OpenAI API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider against the public OpenAI endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with an explicit request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Unauthorized("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            client,
        })
    }

    /// Point the provider at another OpenAI-compatible base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send a single-message chat and return the assistant's reply
    pub async fn chat(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                return Err(LlmError::Unauthorized(format!("HTTP {}", status)));
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimitExceeded),
            reqwest::StatusCode::NOT_FOUND => {
                return Err(LlmError::ModelNotAvailable(self.model.clone()));
            }
            _ => {}
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))
    }
}

impl TextCompletion for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        block_on(self.chat(prompt))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_defaults() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_MODEL).unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, "gpt-3.5-turbo");
        assert_eq!(provider.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_openai_provider_builders() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o-mini")
            .unwrap()
            .with_endpoint("http://localhost:8000/v1/")
            .with_temperature(0.0);
        assert_eq!(provider.endpoint, "http://localhost:8000/v1");
        assert_eq!(provider.temperature, 0.0);
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = OpenAiProvider::new("  ", DEFAULT_MODEL);
        assert!(matches!(result, Err(LlmError::Unauthorized(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let provider = OpenAiProvider::new("sk-secret", DEFAULT_MODEL).unwrap();
        assert!(!format!("{:?}", provider).contains("sk-secret"));
    }

    #[test]
    fn test_request_serialization() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Type: Work"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Type: Work")
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_MODEL)
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/v1");
        let result = provider.chat("hello").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
