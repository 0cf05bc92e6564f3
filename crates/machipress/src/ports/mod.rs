//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the pipeline interacts with
//! external systems (storage, generation service, version control).
//!
//! Implementations live in the `adapters` module.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
