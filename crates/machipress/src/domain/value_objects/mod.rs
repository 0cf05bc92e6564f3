//! Value Objects
//!
//! Immutable value types shared across the pipeline.

mod article_type;
mod verdict;

pub use article_type::*;
pub use verdict::*;
