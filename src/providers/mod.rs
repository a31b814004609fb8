//! Capability provider traits and their domain registries.
//!
//! Each domain (generation, search, embedding) defines an async provider
//! trait, a closure adapter for wrapping plain functions, and an instantiation
//! of [`ProviderRegistry`](crate::registry::ProviderRegistry) with the
//! domain's dispatch method.

pub mod embedding;
pub mod generate;
pub mod search;

pub use embedding::{EmbeddingFn, EmbeddingProvider, EmbeddingRegistry};
pub use generate::{GenerateFn, GenerateProvider, GenerateRegistry};
pub use search::{SearchFn, SearchProvider, SearchRecord, SearchRegistry, format_results};
