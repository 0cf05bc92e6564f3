//! Service Ports
//!
//! Abstract interfaces for external services.

mod llm_provider;
mod version_control;

pub use llm_provider::*;
pub use version_control::*;
