//! LLM Provider Port
//!
//! Abstract interface for the external text-generation service. The model
//! is a black box with bounded-latency, possibly-failing semantics; the
//! port distinguishes transient failures (worth retrying) from fatal ones
//! through [`PipelineError::Api`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::PipelineError;

/// Request for a single generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Fully rendered prompt text.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 8000,
        }
    }
}

/// Response from a generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Generated article text (markdown).
    pub content: String,
    /// Model that produced the response.
    pub model: String,
}

/// LLM provider interface
///
/// Implementations classify failures: timeouts, rate limits and overloaded
/// upstreams surface as retryable `Api` errors; authentication failures and
/// malformed requests as fatal ones.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one blocking generation call with a bounded timeout.
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, PipelineError>;

    /// Model id used for generation.
    fn model_id(&self) -> &str;
}
