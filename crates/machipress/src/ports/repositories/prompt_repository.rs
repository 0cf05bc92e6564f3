//! Prompt Repository Port
//!
//! Abstract interface for durable prompt-template storage.

use crate::domain::{ArticleType, PipelineError, PromptSummary, PromptTemplate};

/// Repository interface for prompt templates.
///
/// Implementations must persist every mutation atomically: a crash
/// mid-write never leaves a half-updated index or body behind.
pub trait PromptRepository: Send + Sync {
    /// All registered templates, in insertion order.
    fn list(&self) -> Result<Vec<PromptSummary>, PipelineError>;

    /// Fetch a template by id.
    fn get(&self, id: &str) -> Result<PromptTemplate, PipelineError>;

    /// Register a new template. Fails with Conflict if the id exists.
    fn add(&self, template: &PromptTemplate) -> Result<(), PipelineError>;

    /// Remove a template and its stored body.
    fn delete(&self, id: &str) -> Result<(), PipelineError>;

    /// Write the template body to `destination` as a standalone file.
    fn export(&self, id: &str, destination: &std::path::Path) -> Result<(), PipelineError>;

    /// Designated default template id for an article type.
    fn default_for(&self, article_type: ArticleType) -> Result<String, PipelineError>;

    /// Mark an existing template as the default for its article type.
    fn set_default(&self, article_type: ArticleType, id: &str) -> Result<(), PipelineError>;
}
