//! Pipeline Services
//!
//! Use-case orchestration on top of the domain and the ports:
//! - catalog: product table access
//! - renderer: prompt template substitution
//! - generator: draft generation with retry
//! - seo: advisory draft analysis
//! - publisher: draft promotion under the publish lock

pub mod catalog;
pub mod generator;
pub mod publisher;
pub mod renderer;
pub mod seo;

pub use catalog::ProductCatalog;
pub use generator::{ArticleGenerator, LengthBand, RetryPolicy};
pub use publisher::Publisher;
pub use seo::SeoValidator;
