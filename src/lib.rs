//! # Patchbay
//!
//! A pluggable capability dispatch layer for agent workflows: provider
//! registries, `"provider/model"` address resolution, and template-driven
//! workflow nodes.
//!
//! ## Features
//!
//! - **Three capability domains**: text generation, web search, and
//!   embeddings, each with its own registry and provider trait
//! - **Default-provider election**: the first registered provider serves
//!   un-addressed calls, so call sites stay backend-agnostic
//! - **Concurrent dispatch**: registry locks are never held across a provider
//!   invocation, so I/O-bound providers run fully in parallel
//! - **Template nodes**: `{placeholder}` prompt rendering over a shared
//!   key-value store, ready to slot into a prep/exec/post workflow engine
//!
//! ## Quick Start
//!
//! ```rust
//! use patchbay::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), DispatchError> {
//! // Register a provider once, during initialization.
//! let registry = Arc::new(GenerateRegistry::new());
//! registry.register(
//!     "echo",
//!     Arc::new(GenerateFn::new(|prompt, model, _opts| {
//!         Ok(format!("{}:{}", model.unwrap_or("default"), prompt))
//!     })),
//! )?;
//!
//! // Dispatch directly...
//! let reply = registry.generate("hi", Some("echo/m1"), &CallOptions::new()).await?;
//! assert_eq!(reply, "m1:hi");
//!
//! // ...or through a workflow node reading and writing shared state.
//! let node = LlmNode::new(Arc::clone(&registry)).with_model("echo/m1");
//! let mut shared = SharedStore::new();
//! shared.insert("input".to_string(), "hi".into());
//! node.run(&mut shared).await?;
//! assert_eq!(shared["output"], "m1:hi");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`registry`]: the generic provider registry and address resolution
//! - [`providers`]: capability traits and the three domain registries
//! - [`nodes`]: the node lifecycle trait and the LLM/search adapters
//! - [`prelude`]: commonly used types (import with `use patchbay::prelude::*`)

// ============================================================================
// Modules
// ============================================================================

pub mod error;
pub mod nodes;
pub mod options;
pub mod providers;
pub mod registry;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

pub use error::{DispatchError, ProviderError};
pub use options::{CallOptions, OptionValue};
pub use registry::{ModelAddress, ProviderRegistry};

// Capability domains
pub use providers::{
    EmbeddingFn, EmbeddingProvider, EmbeddingRegistry, GenerateFn, GenerateProvider,
    GenerateRegistry, SearchFn, SearchProvider, SearchRecord, SearchRegistry, format_results,
};

// Workflow nodes
pub use nodes::{LlmNode, NodeLogic, NodeValue, PromptTemplate, RetryPolicy, SearchNode, SharedStore};

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// The prelude: imports everything needed for registry wiring and node use.
///
/// # Example
/// ```rust
/// use patchbay::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        CallOptions,
        DispatchError,
        EmbeddingFn,
        EmbeddingProvider,
        // Domains
        EmbeddingRegistry,
        GenerateFn,
        GenerateProvider,
        GenerateRegistry,
        // Nodes
        LlmNode,
        ModelAddress,
        NodeLogic,
        NodeValue,
        OptionValue,
        PromptTemplate,
        ProviderError,
        // Core
        ProviderRegistry,
        RetryPolicy,
        SearchFn,
        SearchNode,
        SearchProvider,
        SearchRecord,
        SearchRegistry,
        SharedStore,
        format_results,
    };
}

// ============================================================================
// Re-export commonly used external types for convenience
// ============================================================================

pub use serde_json::Value as JsonValue;
pub use std::collections::HashMap;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
