//! Git CLI implementation of VersionControl
//!
//! Shells out to the system `git` against the content repository.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::errors::PipelineError;
use crate::ports::VersionControl;

/// Version control backed by the `git` binary
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<(), PipelineError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                PipelineError::Publish(format!(
                    "Failed to run git (is it installed?): {}",
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::Publish(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn stage(&self, path: &Path) -> Result<(), PipelineError> {
        self.run(&["add", &path.to_string_lossy()]).await
    }

    async fn commit(&self, message: &str) -> Result<(), PipelineError> {
        self.run(&["commit", "-m", message]).await
    }

    async fn push(&self) -> Result<(), PipelineError> {
        self.run(&["push"]).await
    }

    async fn unstage(&self, path: &Path) -> Result<(), PipelineError> {
        self.run(&["reset", "--", &path.to_string_lossy()]).await
    }

    // Soft reset so unrelated uncommitted changes in the content repo
    // survive the rollback; the publisher unstages the post path itself.
    async fn undo_last_commit(&self) -> Result<(), PipelineError> {
        self.run(&["reset", "--soft", "HEAD^"]).await
    }
}
