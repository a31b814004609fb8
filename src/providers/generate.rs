use async_trait::async_trait;

use crate::error::{DispatchError, ProviderError};
use crate::options::CallOptions;
use crate::registry::ProviderRegistry;

/// A text-generation backend.
///
/// Implementations are opaque to the registry: they receive the rendered
/// prompt, the model identifier resolved from the address (if any), and the
/// caller's options, and return the generated text or a backend error.
#[async_trait]
pub trait GenerateProvider: Send + Sync {
    /// Generates text for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<String, ProviderError>;
}

/// Wraps a plain function or closure as a [`GenerateProvider`].
///
/// Restores register-a-function ergonomics for mocks and simple synchronous
/// backends; async backends implement the trait directly.
///
/// # Example
/// ```rust
/// use patchbay::{CallOptions, GenerateFn, GenerateRegistry};
/// use std::sync::Arc;
///
/// let registry = GenerateRegistry::new();
/// registry
///     .register(
///         "echo",
///         Arc::new(GenerateFn::new(|prompt, model, _opts| {
///             Ok(format!("{}:{}", model.unwrap_or("default"), prompt))
///         })),
///     )
///     .unwrap();
/// ```
pub struct GenerateFn<F> {
    f: F,
}

impl<F> GenerateFn<F>
where
    F: Fn(&str, Option<&str>, &CallOptions) -> Result<String, ProviderError>
        + Send
        + Sync
        + 'static,
{
    /// Wraps `f` as a provider.
    pub fn new(f: F) -> Self {
        GenerateFn { f }
    }
}

#[async_trait]
impl<F> GenerateProvider for GenerateFn<F>
where
    F: Fn(&str, Option<&str>, &CallOptions) -> Result<String, ProviderError>
        + Send
        + Sync
        + 'static,
{
    async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<String, ProviderError> {
        (self.f)(prompt, model, options)
    }
}

/// The generation-domain registry.
pub type GenerateRegistry = ProviderRegistry<dyn GenerateProvider>;

impl GenerateRegistry {
    /// Resolves `model` and invokes the provider's
    /// [`generate`](GenerateProvider::generate) outside the registry lock.
    ///
    /// # Errors
    /// Resolution errors per [`resolve`](ProviderRegistry::resolve); provider
    /// failures are propagated unchanged as [`DispatchError::Provider`].
    pub async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<String, DispatchError> {
        let (provider, model) = self.resolve(model)?;
        provider
            .generate(prompt, model.as_deref(), options)
            .await
            .map_err(DispatchError::Provider)
    }
}
