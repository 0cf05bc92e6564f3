//! Pipeline configuration loaded from environment variables.
//!
//! Read once at process start, never mutated. A `.env` file at the content
//! root is honored when present.

use std::path::PathBuf;

use crate::domain::errors::PipelineError;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MIN_CHARS: usize = 800;
const DEFAULT_MAX_CHARS: usize = 20_000;
const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Generation-service credential. Required only for generation.
    pub anthropic_api_key: Option<String>,
    /// Model identifier passed to the generation service.
    pub model: String,
    /// Site base URL, used in operator-facing messages.
    pub site_base_url: Option<String>,
    /// Root of the content repository (catalog, prompts, drafts, posts).
    pub content_root: PathBuf,
    /// Accepted length band for generated articles, in characters.
    pub min_article_chars: usize,
    pub max_article_chars: usize,
    /// Per-call timeout for the generation service.
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, PipelineError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let content_root = std::env::var("CONTENT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("CLAUDE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            site_base_url: std::env::var("SITE_BASE_URL").ok(),
            content_root,
            min_article_chars: parse_env("GENERATION_MIN_CHARS", DEFAULT_MIN_CHARS)?,
            max_article_chars: parse_env("GENERATION_MAX_CHARS", DEFAULT_MAX_CHARS)?,
            request_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Credential for the generation service, required for `generate`.
    pub fn require_api_key(&self) -> Result<&str, PipelineError> {
        self.anthropic_api_key.as_deref().ok_or_else(|| {
            PipelineError::Config(
                "ANTHROPIC_API_KEY is not set. Add it to your environment or .env file."
                    .to_string(),
            )
        })
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.content_root.join("data").join("apps.csv")
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.content_root.join("data").join("prompts")
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.content_root.join("_drafts")
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.content_root.join("_posts")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, PipelineError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| PipelineError::Config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
