//! Adapters
//!
//! Infrastructure implementations of the ports:
//! - `fs`: file-backed prompt registry and draft store
//! - `anthropic`: reqwest client for the generation service
//! - `git`: git CLI version control

pub mod anthropic;
pub mod fs;
pub mod git;

pub use anthropic::AnthropicProvider;
pub use fs::{DraftStore, FsPromptRepository};
pub use git::GitCli;
