//! Version Control Port
//!
//! Abstract interface over the repository backing the post store. The
//! publisher drives it through the stage → commit → push sequence and
//! relies on `undo_last_commit` for rollback when the push is rejected.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::PipelineError;

/// Version-control operations used by the publisher
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Stage a single path.
    async fn stage(&self, path: &Path) -> Result<(), PipelineError>;

    /// Commit staged changes with the given message.
    async fn commit(&self, message: &str) -> Result<(), PipelineError>;

    /// Push the current branch to its remote.
    async fn push(&self) -> Result<(), PipelineError>;

    /// Remove a single path from the index, leaving the rest untouched.
    async fn unstage(&self, path: &Path) -> Result<(), PipelineError>;

    /// Drop the most recent commit, leaving its changes staged.
    async fn undo_last_commit(&self) -> Result<(), PipelineError>;
}
