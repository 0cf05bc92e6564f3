//! Machipress Domain Library
//!
//! Core pipeline for generating and publishing matching-app affiliate
//! review articles: prompt template management, article generation via an
//! external LLM, SEO analysis of drafts, and publication into a
//! version-controlled post store.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core models (ProductRecord, PromptTemplate, Draft, SeoReport)
//!   - `value_objects/`: Immutable value types (ArticleType, Verdict)
//!   - `errors/`: Pipeline error taxonomy with exit-code mapping
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Prompt template persistence
//!   - `services/`: Generation service and version control
//!
//! - **Adapters** (`adapters/`): Infrastructure implementations
//!   - file-backed prompt registry and draft store, Anthropic API client,
//!     git CLI
//!
//! - **Services** (`services/`): Use-case orchestration
//!   - catalog, renderer, generator, seo, publisher

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use config::Config;
pub use domain::{
    ApiErrorKind, ArticleType, Draft, FrontMatter, PipelineError, ProductRecord, PromptSummary,
    PromptTemplate, SeoCheck, SeoReport, Verdict,
};
pub use ports::{
    GenerationRequest, GenerationResponse, LlmProvider, PromptRepository, VersionControl,
};
pub use services::{
    ArticleGenerator, LengthBand, ProductCatalog, Publisher, RetryPolicy, SeoValidator,
};
