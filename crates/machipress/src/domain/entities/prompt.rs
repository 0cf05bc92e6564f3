//! PromptTemplate - Reusable prompt templates for article generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ArticleType;

/// A reusable prompt template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptTemplate {
    /// Opaque operator-chosen id, unique across the registry.
    pub id: String,
    pub name: String,
    pub article_type: ArticleType,
    pub description: String,
    /// Template body with `{placeholder}` tokens.
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl PromptTemplate {
    /// Create a new template stamped with the current time
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        article_type: ArticleType,
        description: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            article_type,
            description: description.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> PromptSummary {
        PromptSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            article_type: self.article_type,
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing entry for a registered template (metadata without the body)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptSummary {
    pub id: String,
    pub name: String,
    pub article_type: ArticleType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
