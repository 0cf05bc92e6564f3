//! Anthropic messages API implementation of LlmProvider
//!
//! Thin reqwest client around `POST /v1/messages`. Failures are classified
//! for the generator's retry loop: timeouts, rate limits and 5xx responses
//! are retryable; authentication failures and malformed requests are fatal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::errors::PipelineError;
use crate::ports::{GenerationRequest, GenerationResponse, LlmProvider};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Anthropic API client
pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn classify_status(status: StatusCode, body: &str) -> PipelineError {
        let message = format!("Generation API returned {}: {}", status, truncate(body, 300));
        match status {
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
                PipelineError::api_retryable(message)
            }
            s if s.is_server_error() => PipelineError::api_retryable(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PipelineError::api_fatal(format!(
                "Authentication with the generation service failed ({})",
                status
            )),
            _ => PipelineError::api_fatal(message),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, PipelineError> {
        let url = format!("{}/v1/messages", self.base_url);
        let payload = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    PipelineError::api_retryable(format!("Generation request failed: {}", e))
                } else {
                    PipelineError::api_fatal(format!("Generation request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::api_fatal(format!("Malformed API response: {}", e)))?;

        let content: String = parsed.content.iter().map(|b| b.text.as_str()).collect();
        if content.is_empty() {
            return Err(PipelineError::api_fatal(
                "Generation API returned an empty response",
            ));
        }

        Ok(GenerationResponse {
            content,
            model: parsed.model,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let retryable = AnthropicProvider::classify_status(StatusCode::TOO_MANY_REQUESTS, "slow");
        assert!(retryable.is_retryable());

        let overloaded =
            AnthropicProvider::classify_status(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(overloaded.is_retryable());

        let auth = AnthropicProvider::classify_status(StatusCode::UNAUTHORIZED, "bad key");
        assert!(!auth.is_retryable());

        let malformed = AnthropicProvider::classify_status(StatusCode::BAD_REQUEST, "bad body");
        assert!(!malformed.is_retryable());
    }
}
