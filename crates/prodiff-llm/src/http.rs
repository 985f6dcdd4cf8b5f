//! HTTP provider for OpenAI-compatible chat endpoints
//!
//! Most hosted and self-hosted inference servers expose the same
//! `/v1/chat/completions` shape, so one provider covers them; anything more
//! vendor-specific stays out of scope.
//!
//! # Features
//!
//! - Async HTTP communication
//! - Configurable endpoint, model, and API key
//! - Retry with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use prodiff_llm::HttpProvider;
//!
//! let provider = HttpProvider::new("http://localhost:8080", "qwen2.5")
//!     .with_api_key("sk-...");
//! ```

use crate::LlmError;
use prodiff_domain::traits::{GenerateOptions, LlmProvider as LlmProviderTrait};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for LLM requests (120 seconds; idea generation is slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Provider for OpenAI-compatible chat-completions APIs
pub struct HttpProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl HttpProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g. "https://api.openai.com")
    /// - `model`: model identifier to request
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the bearer token sent with each request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate a completion for the prompt
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable, the model is
    /// unknown, the rate limit trips, or the response body has an
    /// unexpected shape.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &options.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt.to_string(),
        });

        let request_body = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let mut request = self.client.post(&url).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        let parsed = response
                            .json::<ChatResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("failed to parse response: {}", e))
                            })?;
                        return parsed
                            .choices
                            .into_iter()
                            .next()
                            .map(|c| c.message.content)
                            .ok_or_else(|| {
                                LlmError::InvalidResponse("response had no choices".to_string())
                            });
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for HttpProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, Self::Error> {
        // Blocking wrapper for async callers that hold no runtime
        tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Other(format!("runtime error: {}", e)))?
            .block_on(async { self.generate(prompt, options).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_provider_creation() {
        let provider = HttpProvider::new("http://localhost:8080", "qwen2.5");
        assert_eq!(provider.endpoint, "http://localhost:8080");
        assert_eq!(provider.model, "qwen2.5");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_http_provider_builders() {
        let provider = HttpProvider::new("http://localhost:8080", "qwen2.5")
            .with_api_key("sk-test")
            .with_max_retries(5);
        assert_eq!(provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(provider.max_retries, 5);
    }

    #[tokio::test]
    async fn test_http_error_handling() {
        // Unreachable endpoint trips the communication path
        let provider =
            HttpProvider::new("http://127.0.0.1:9", "qwen2.5").with_max_retries(1);

        let result = provider
            .generate("test", &GenerateOptions::default())
            .await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
