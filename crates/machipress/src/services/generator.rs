//! ArticleGenerator - end-to-end draft generation
//!
//! Orchestrates catalog lookup, template resolution and rendering, the
//! external generation call with bounded retry, output validation, and
//! draft persistence.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use crate::adapters::fs::DraftStore;
use crate::domain::{ApiErrorKind, ArticleType, Draft, FrontMatter, PipelineError};
use crate::ports::{GenerationRequest, LlmProvider, PromptRepository};
use crate::services::catalog::ProductCatalog;
use crate::services::renderer::{render, TemplateVars};

/// Retry policy for transient generation-service failures.
///
/// Delays grow exponentially: `base_delay * 2^attempt`. Tests inject a
/// zero base delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    fn delay_before(&self, next_attempt: u32) -> Duration {
        // next_attempt is 1-based; the first retry waits base_delay.
        self.base_delay * 2u32.saturating_pow(next_attempt.saturating_sub(2))
    }
}

/// Accepted length band for generated articles, in characters.
#[derive(Debug, Clone, Copy)]
pub struct LengthBand {
    pub min_chars: usize,
    pub max_chars: usize,
}

/// Draft generation service
pub struct ArticleGenerator {
    catalog: ProductCatalog,
    prompts: Arc<dyn PromptRepository>,
    provider: Arc<dyn LlmProvider>,
    drafts: DraftStore,
    retry: RetryPolicy,
    band: LengthBand,
}

impl ArticleGenerator {
    pub fn new(
        catalog: ProductCatalog,
        prompts: Arc<dyn PromptRepository>,
        provider: Arc<dyn LlmProvider>,
        drafts: DraftStore,
        retry: RetryPolicy,
        band: LengthBand,
    ) -> Self {
        Self {
            catalog,
            prompts,
            provider,
            drafts,
            retry,
            band,
        }
    }

    /// Generate a draft dated today.
    pub async fn generate(
        &self,
        product_name: &str,
        article_type: ArticleType,
        prompt_id: Option<&str>,
    ) -> Result<Draft, PipelineError> {
        self.generate_on(product_name, article_type, prompt_id, Utc::now().date_naive())
            .await
    }

    /// Generate a draft for an explicit date (slug and front matter).
    pub async fn generate_on(
        &self,
        product_name: &str,
        article_type: ArticleType,
        prompt_id: Option<&str>,
        date: NaiveDate,
    ) -> Result<Draft, PipelineError> {
        let product = self.catalog.lookup(product_name)?;

        let template_id = match prompt_id {
            Some(id) => id.to_string(),
            None => self.prompts.default_for(article_type)?,
        };
        let template = self.prompts.get(&template_id)?;
        if template.article_type != article_type {
            tracing::warn!(
                template_id = %template.id,
                "Template is typed '{}' but a '{}' article was requested",
                template.article_type,
                article_type
            );
        }

        let slug = format!("{}-{}-{}", date.format("%Y-%m-%d"), product.slug_token(), article_type);
        if self.drafts.exists(&slug) {
            return Err(PipelineError::Conflict(format!(
                "Draft '{}' already exists. Remove or rename it before regenerating.",
                self.drafts.path_for(&slug).display()
            )));
        }

        let vars = TemplateVars::from_product(&product, date);
        let prompt = render(&template.body, &vars);

        tracing::info!(product = %product.name, %article_type, template_id = %template.id, "Generating article");
        let content = self.call_with_retry(&prompt).await?;
        self.validate_length(&content)?;

        let (title, body) = extract_title(&content)
            .unwrap_or_else(|| (format!("{} {}", product.name, article_type.title_label()), content.clone()));

        let draft = Draft {
            slug,
            front_matter: FrontMatter {
                title,
                date,
                article_type,
                source: product.name.clone(),
                rating: product.rating,
                categories: vec![product.category.clone()],
            },
            body,
            generated_at: Utc::now(),
            prompt_id: template.id,
        };

        let path = self.drafts.save(&draft)?;
        tracing::info!(path = %path.display(), "Draft saved");
        Ok(draft)
    }

    /// Run the generation call, retrying transient failures with backoff.
    async fn call_with_retry(&self, prompt: &str) -> Result<String, PipelineError> {
        let request = GenerationRequest::new(prompt);
        let mut last_message = String::new();

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.retry.delay_before(attempt)).await;
            }
            match self.provider.generate(&request).await {
                Ok(response) => return Ok(response.content),
                Err(err) if err.is_retryable() => {
                    tracing::warn!(attempt, error = %err, "Transient generation failure");
                    last_message = err.to_string();
                }
                Err(err) => return Err(err),
            }
        }

        Err(PipelineError::Api {
            kind: ApiErrorKind::ExhaustedRetries,
            message: format!(
                "Generation failed after {} attempts; last error: {}",
                self.retry.max_attempts, last_message
            ),
        })
    }

    fn validate_length(&self, content: &str) -> Result<(), PipelineError> {
        let chars = content.chars().count();
        if chars == 0 {
            return Err(PipelineError::Validation(
                "Generated article is empty".to_string(),
            ));
        }
        if chars < self.band.min_chars {
            return Err(PipelineError::Validation(format!(
                "Generated article is too short ({} chars, minimum {}); the output may be truncated",
                chars, self.band.min_chars
            )));
        }
        if chars > self.band.max_chars {
            return Err(PipelineError::Validation(format!(
                "Generated article is too long ({} chars, maximum {}); generation may have run away",
                chars, self.band.max_chars
            )));
        }
        Ok(())
    }
}

/// Pull a leading `# ` heading out of generated content as the title.
fn extract_title(content: &str) -> Option<(String, String)> {
    let trimmed = content.trim_start();
    let first_line = trimmed.lines().next()?;
    let title = first_line.strip_prefix("# ")?.trim();
    if title.is_empty() {
        return None;
    }
    let body = trimmed[first_line.len()..].trim_start().to_string();
    Some((title.to_string(), body))
}
