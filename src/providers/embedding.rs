use async_trait::async_trait;

use crate::error::{DispatchError, ProviderError};
use crate::options::CallOptions;
use crate::registry::ProviderRegistry;

/// An embedding backend.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text into a numeric vector.
    async fn embed(
        &self,
        text: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<f32>, ProviderError>;

    /// Embeds a batch of texts.
    ///
    /// The default implementation embeds sequentially; backends with a native
    /// batch endpoint should override it.
    async fn embed_batch(
        &self,
        texts: &[&str],
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text, model, options).await?);
        }
        Ok(embeddings)
    }
}

/// Wraps a plain function or closure as an [`EmbeddingProvider`].
pub struct EmbeddingFn<F> {
    f: F,
}

impl<F> EmbeddingFn<F>
where
    F: Fn(&str, Option<&str>, &CallOptions) -> Result<Vec<f32>, ProviderError>
        + Send
        + Sync
        + 'static,
{
    /// Wraps `f` as a provider.
    pub fn new(f: F) -> Self {
        EmbeddingFn { f }
    }
}

#[async_trait]
impl<F> EmbeddingProvider for EmbeddingFn<F>
where
    F: Fn(&str, Option<&str>, &CallOptions) -> Result<Vec<f32>, ProviderError>
        + Send
        + Sync
        + 'static,
{
    async fn embed(
        &self,
        text: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<f32>, ProviderError> {
        (self.f)(text, model, options)
    }
}

/// The embedding-domain registry.
pub type EmbeddingRegistry = ProviderRegistry<dyn EmbeddingProvider>;

impl EmbeddingRegistry {
    /// Resolves `model` and invokes the provider's
    /// [`embed`](EmbeddingProvider::embed) outside the registry lock.
    ///
    /// # Errors
    /// Resolution errors per [`resolve`](ProviderRegistry::resolve); provider
    /// failures are propagated unchanged as [`DispatchError::Provider`].
    pub async fn embed(
        &self,
        text: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<f32>, DispatchError> {
        let (provider, model) = self.resolve(model)?;
        provider
            .embed(text, model.as_deref(), options)
            .await
            .map_err(DispatchError::Provider)
    }

    /// Resolves `model` once and embeds the whole batch through the provider.
    ///
    /// # Errors
    /// Same as [`embed`](EmbeddingRegistry::embed).
    pub async fn embed_batch(
        &self,
        texts: &[&str],
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<Vec<f32>>, DispatchError> {
        let (provider, model) = self.resolve(model)?;
        provider
            .embed_batch(texts, model.as_deref(), options)
            .await
            .map_err(DispatchError::Provider)
    }
}
