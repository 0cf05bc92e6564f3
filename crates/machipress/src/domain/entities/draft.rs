//! Draft - A generated article awaiting review
//!
//! Drafts are stored as markdown files with a YAML front-matter header.
//! The header layout is consumed verbatim by the downstream site renderer,
//! so serialization is hand-written and field order is fixed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::PipelineError;
use crate::domain::value_objects::ArticleType;

/// Structured front-matter header of an article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub article_type: ArticleType,
    /// Source product name from the catalog.
    pub source: String,
    pub rating: f32,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl FrontMatter {
    /// Render the header exactly as the site renderer expects it.
    ///
    /// String values are double-quoted so names containing YAML
    /// metacharacters (`:`, `#`) survive the round trip.
    pub fn to_yaml(&self) -> String {
        let mut out = String::new();
        out.push_str("---\n");
        out.push_str(&format!("title: {}\n", quote(&self.title)));
        out.push_str(&format!("date: {}\n", self.date.format("%Y-%m-%d")));
        out.push_str(&format!("type: {}\n", self.article_type));
        out.push_str(&format!("source: {}\n", quote(&self.source)));
        out.push_str(&format!("rating: {}\n", self.rating));
        let categories: Vec<String> = self.categories.iter().map(|c| quote(c)).collect();
        out.push_str(&format!("categories: [{}]\n", categories.join(", ")));
        out.push_str("---\n");
        out
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// A generated article prior to publication
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// Filename stem: `YYYY-MM-DD-<product>-<type>`.
    pub slug: String,
    pub front_matter: FrontMatter,
    /// Article body in markdown, without the front-matter header.
    pub body: String,
    pub generated_at: DateTime<Utc>,
    /// Id of the prompt template that produced this draft.
    pub prompt_id: String,
}

impl Draft {
    pub fn title(&self) -> &str {
        &self.front_matter.title
    }

    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }

    /// Full file content: front matter followed by the body.
    pub fn to_markdown(&self) -> String {
        format!("{}\n{}\n", self.front_matter.to_yaml(), self.body.trim_end())
    }

    /// Parse a stored draft back from its file content.
    ///
    /// `prompt_id` is not part of the on-disk format; re-parsed drafts
    /// carry an empty one.
    pub fn from_markdown(slug: impl Into<String>, content: &str) -> Result<Self, PipelineError> {
        let (front_matter, body) = split_front_matter(content)?;
        let front_matter: FrontMatter = serde_yaml_ng::from_str(front_matter)
            .map_err(|e| PipelineError::Data(format!("Invalid front matter: {}", e)))?;
        Ok(Self {
            slug: slug.into(),
            front_matter,
            body: body.trim().to_string(),
            generated_at: Utc::now(),
            prompt_id: String::new(),
        })
    }
}

/// Split a markdown document into (front matter, body).
///
/// The document must start with a `---` line and contain a closing `---`.
pub fn split_front_matter(content: &str) -> Result<(&str, &str), PipelineError> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
        .ok_or_else(|| {
            PipelineError::Data("Front matter not found: file must start with '---'".to_string())
        })?;
    let end = rest
        .find("\n---")
        .ok_or_else(|| PipelineError::Data("Front matter is not closed with '---'".to_string()))?;
    let header = &rest[..end];
    let after = &rest[end + 4..];
    let body = after.strip_prefix('\n').unwrap_or(after);
    Ok((header, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_matter() -> FrontMatter {
        FrontMatter {
            title: "「Tinder」徹底レビュー".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(),
            article_type: ArticleType::Review,
            source: "Tinder".to_string(),
            rating: 4.2,
            categories: vec!["casual".to_string()],
        }
    }

    #[test]
    fn test_front_matter_layout_is_fixed() {
        let yaml = front_matter().to_yaml();
        assert_eq!(
            yaml,
            "---\ntitle: \"「Tinder」徹底レビュー\"\ndate: 2026-02-08\ntype: review\nsource: \"Tinder\"\nrating: 4.2\ncategories: [\"casual\"]\n---\n"
        );
    }

    #[test]
    fn test_yaml_metacharacters_in_source_roundtrip() {
        let mut fm = front_matter();
        fm.source = "Match: Japan #1".to_string();
        fm.categories = vec!["serious: premium".to_string()];
        let draft = Draft {
            slug: "2026-02-08-match-japan-1-review".to_string(),
            front_matter: fm.clone(),
            body: "## 概要".to_string(),
            generated_at: Utc::now(),
            prompt_id: "default-review".to_string(),
        };
        let parsed = Draft::from_markdown(draft.slug.clone(), &draft.to_markdown()).unwrap();
        assert_eq!(parsed.front_matter, fm);
    }

    #[test]
    fn test_markdown_roundtrip() {
        let draft = Draft {
            slug: "2026-02-08-tinder-review".to_string(),
            front_matter: front_matter(),
            body: "## 概要\n\nTinderは…".to_string(),
            generated_at: Utc::now(),
            prompt_id: "default-review".to_string(),
        };
        let content = draft.to_markdown();
        let parsed = Draft::from_markdown(draft.slug.clone(), &content).unwrap();
        assert_eq!(parsed.front_matter, draft.front_matter);
        assert_eq!(parsed.body, draft.body);
    }

    #[test]
    fn test_missing_front_matter_rejected() {
        let err = Draft::from_markdown("x", "# no header\n").unwrap_err();
        assert!(matches!(err, PipelineError::Data(_)));
    }
}
