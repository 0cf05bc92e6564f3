//! Publisher - promote a draft into the version-controlled post store
//!
//! State machine: draft → (acquire publish lock) → staged → (commit, push)
//! → published. Any failure after the move rolls back to draft, so a
//! failed publish never leaves the post store or history half-updated.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;

use crate::adapters::fs::DraftStore;
use crate::domain::PipelineError;
use crate::ports::VersionControl;

const LOCK_FILE: &str = ".machipress-publish.lock";

/// Exclusive publish lock, held for the duration of one publish.
///
/// Process-external: a marker file in the content root, visible to
/// concurrent invocations. Released on drop, every exit path included.
struct PublishLock {
    path: PathBuf,
}

impl PublishLock {
    fn acquire(path: PathBuf) -> Result<Self, PipelineError> {
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                Ok(Self { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(PipelineError::Busy(format!(
                    "Another publish is in progress (lock held at {}). Retry once it finishes.",
                    path.display()
                )))
            }
            Err(e) => Err(PipelineError::Io(format!(
                "Failed to acquire publish lock: {}",
                e
            ))),
        }
    }
}

impl Drop for PublishLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Publication service
pub struct Publisher {
    drafts: DraftStore,
    posts_dir: PathBuf,
    content_root: PathBuf,
    vcs: Arc<dyn VersionControl>,
    filename: Regex,
}

impl Publisher {
    pub fn new(
        drafts: DraftStore,
        posts_dir: impl Into<PathBuf>,
        content_root: impl Into<PathBuf>,
        vcs: Arc<dyn VersionControl>,
    ) -> Self {
        Self {
            drafts,
            posts_dir: posts_dir.into(),
            content_root: content_root.into(),
            vcs,
            filename: Regex::new(r"^\d{4}-\d{2}-\d{2}-.+$").expect("valid filename pattern"),
        }
    }

    /// Publish the draft with the given slug. Returns the post path.
    ///
    /// With `push` false the commit stays local and no rollback is needed
    /// afterwards; with `push` true a rejected push rolls everything back.
    pub async fn publish(&self, slug: &str, push: bool) -> Result<PathBuf, PipelineError> {
        if !self.filename.is_match(slug) {
            return Err(PipelineError::Validation(format!(
                "Invalid draft name '{}'; expected YYYY-MM-DD-title",
                slug
            )));
        }

        let draft_path = self.drafts.path_for(slug);
        if !draft_path.exists() {
            return Err(PipelineError::not_found("draft", slug));
        }
        // Raw content is kept for the rollback path.
        let raw = fs::read_to_string(&draft_path)
            .map_err(|e| PipelineError::Io(format!("Failed to read draft: {}", e)))?;
        let draft = self.drafts.load(slug)?;

        let _lock = PublishLock::acquire(self.content_root.join(LOCK_FILE))?;

        let destination = self.posts_dir.join(draft.file_name());
        if destination.exists() {
            return Err(PipelineError::Conflict(format!(
                "Post '{}' already exists. Remove it before republishing.",
                destination.display()
            )));
        }
        fs::create_dir_all(&self.posts_dir)
            .map_err(|e| PipelineError::Io(format!("Failed to create post store: {}", e)))?;
        fs::rename(&draft_path, &destination)
            .map_err(|e| PipelineError::Io(format!("Failed to move draft into posts: {}", e)))?;
        tracing::info!(post = %destination.display(), "Draft staged into post store");

        if let Err(err) = self.commit(&destination, &draft).await {
            if let Err(vcs_err) = self.vcs.unstage(&destination).await {
                tracing::error!(error = %vcs_err, "Failed to unstage post during rollback");
            }
            self.restore_draft(slug, &destination, &raw);
            return Err(err);
        }

        if push {
            if let Err(err) = self.vcs.push().await {
                tracing::warn!(error = %err, "Push rejected; rolling back publish");
                self.rollback_commit(slug, &destination, &raw).await;
                return Err(PipelineError::Publish(format!(
                    "Push failed and the publish was rolled back: {}",
                    err
                )));
            }
        }

        tracing::info!(post = %destination.display(), "Article published");
        Ok(destination)
    }

    async fn commit(&self, destination: &Path, draft: &crate::domain::Draft) -> Result<(), PipelineError> {
        self.vcs.stage(destination).await?;
        let message = format!(
            "feat: publish {} {} article - {}",
            draft.front_matter.source, draft.front_matter.article_type, draft.title()
        );
        self.vcs.commit(&message).await
    }

    /// Move the post file back into the draft store.
    fn restore_draft(&self, slug: &str, destination: &Path, raw: &str) {
        if fs::rename(destination, self.drafts.path_for(slug)).is_err() {
            let _ = fs::remove_file(destination);
            let _ = self.drafts.restore(slug, raw);
        }
    }

    /// Undo a local commit after a rejected push and restore the draft.
    /// The commit is reset softly, so the post path must also be removed
    /// from the index before the file itself goes back to drafts.
    async fn rollback_commit(&self, slug: &str, destination: &Path, raw: &str) {
        if let Err(err) = self.vcs.undo_last_commit().await {
            tracing::error!(error = %err, "Failed to revert local commit during rollback");
        }
        if let Err(err) = self.vcs.unstage(destination).await {
            tracing::error!(error = %err, "Failed to unstage post during rollback");
        }
        self.restore_draft(slug, destination, raw);
    }
}
