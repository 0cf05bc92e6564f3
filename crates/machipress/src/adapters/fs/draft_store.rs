//! Draft store - filesystem `_drafts/` directory
//!
//! Holds generated articles awaiting review. Writes never overwrite: a
//! slug collision is a Conflict the caller must resolve explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Draft, PipelineError};

/// Filesystem-backed draft store
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.md", slug))
    }

    pub fn exists(&self, slug: &str) -> bool {
        self.path_for(slug).exists()
    }

    /// Persist a new draft. Fails with Conflict if the slug is taken.
    pub fn save(&self, draft: &Draft) -> Result<PathBuf, PipelineError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| PipelineError::Io(format!("Failed to create draft store: {}", e)))?;
        let path = self.path_for(&draft.slug);
        if path.exists() {
            return Err(PipelineError::Conflict(format!(
                "Draft '{}' already exists. Remove or rename it before regenerating.",
                path.display()
            )));
        }
        fs::write(&path, draft.to_markdown())
            .map_err(|e| PipelineError::Io(format!("Failed to save draft: {}", e)))?;
        Ok(path)
    }

    /// Load a draft by slug.
    pub fn load(&self, slug: &str) -> Result<Draft, PipelineError> {
        let path = self.path_for(slug);
        if !path.exists() {
            return Err(PipelineError::not_found("draft", slug));
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| PipelineError::Io(format!("Failed to read draft: {}", e)))?;
        Draft::from_markdown(slug, &content)
    }

    /// Remove a draft file (used when a publish consumes it).
    pub fn remove(&self, slug: &str) -> Result<(), PipelineError> {
        let path = self.path_for(slug);
        if !path.exists() {
            return Err(PipelineError::not_found("draft", slug));
        }
        fs::remove_file(&path)
            .map_err(|e| PipelineError::Io(format!("Failed to remove draft: {}", e)))
    }

    /// Write raw content back under a slug (publish rollback path).
    pub fn restore(&self, slug: &str, content: &str) -> Result<PathBuf, PipelineError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| PipelineError::Io(format!("Failed to create draft store: {}", e)))?;
        let path = self.path_for(slug);
        fs::write(&path, content)
            .map_err(|e| PipelineError::Io(format!("Failed to restore draft: {}", e)))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArticleType, FrontMatter};
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn draft(slug: &str) -> Draft {
        Draft {
            slug: slug.to_string(),
            front_matter: FrontMatter {
                title: "テストタイトル".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(),
                article_type: ArticleType::Review,
                source: "Tinder".to_string(),
                rating: 4.2,
                categories: vec!["casual".to_string()],
            },
            body: "## 概要\n\n本文です。".to_string(),
            generated_at: Utc::now(),
            prompt_id: "default-review".to_string(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = DraftStore::new(dir.path().join("_drafts"));
        let d = draft("2026-02-08-tinder-review");
        store.save(&d).unwrap();

        let loaded = store.load("2026-02-08-tinder-review").unwrap();
        assert_eq!(loaded.front_matter, d.front_matter);
        assert_eq!(loaded.body, d.body);
    }

    #[test]
    fn test_save_existing_slug_conflicts() {
        let dir = TempDir::new().unwrap();
        let store = DraftStore::new(dir.path().join("_drafts"));
        let d = draft("2026-02-08-tinder-review");
        store.save(&d).unwrap();
        assert!(matches!(
            store.save(&d).unwrap_err(),
            PipelineError::Conflict(_)
        ));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = DraftStore::new(dir.path().join("_drafts"));
        assert!(matches!(
            store.load("nope").unwrap_err(),
            PipelineError::NotFound { .. }
        ));
    }
}
