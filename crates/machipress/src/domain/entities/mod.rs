//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - ProductRecord: catalog row for a matching-app product
//! - PromptTemplate: reusable generation prompt
//! - Draft: generated article awaiting review
//! - SeoReport: advisory quality assessment of a draft

mod draft;
mod product;
mod prompt;
mod seo_report;

pub use draft::*;
pub use product::*;
pub use prompt::*;
pub use seo_report::*;
