//! Filesystem adapters
//!
//! Durable stores for prompt templates and drafts.

mod draft_store;
mod prompt_repository;

pub use draft_store::*;
pub use prompt_repository::*;
