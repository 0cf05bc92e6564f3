//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod prompt_repository;

pub use prompt_repository::*;
