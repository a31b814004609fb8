use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, ProviderError};
use crate::options::CallOptions;
use crate::registry::ProviderRegistry;

/// One structured web-search result.
///
/// Records decoded from loose provider JSON keep formatting sensibly: missing
/// fields fall back to `"No title"` / `"No description"` / `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_snippet")]
    pub snippet: String,
    #[serde(default)]
    pub url: String,
}

fn default_title() -> String {
    "No title".to_string()
}

fn default_snippet() -> String {
    "No description".to_string()
}

impl SearchRecord {
    /// Convenience constructor for fully populated records.
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        SearchRecord {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// A web-search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs `query` and returns results in ranking order.
    ///
    /// `model` carries the model segment of the resolved address, for backends
    /// that expose multiple search indexes or engines; most ignore it.
    async fn search(
        &self,
        query: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<SearchRecord>, ProviderError>;
}

/// Wraps a plain function or closure as a [`SearchProvider`].
pub struct SearchFn<F> {
    f: F,
}

impl<F> SearchFn<F>
where
    F: Fn(&str, Option<&str>, &CallOptions) -> Result<Vec<SearchRecord>, ProviderError>
        + Send
        + Sync
        + 'static,
{
    /// Wraps `f` as a provider.
    pub fn new(f: F) -> Self {
        SearchFn { f }
    }
}

#[async_trait]
impl<F> SearchProvider for SearchFn<F>
where
    F: Fn(&str, Option<&str>, &CallOptions) -> Result<Vec<SearchRecord>, ProviderError>
        + Send
        + Sync
        + 'static,
{
    async fn search(
        &self,
        query: &str,
        model: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<SearchRecord>, ProviderError> {
        (self.f)(query, model, options)
    }
}

/// The search-domain registry.
pub type SearchRegistry = ProviderRegistry<dyn SearchProvider>;

impl SearchRegistry {
    /// Resolves `address` and invokes the provider's
    /// [`search`](SearchProvider::search) outside the registry lock.
    ///
    /// # Errors
    /// Resolution errors per [`resolve`](ProviderRegistry::resolve); provider
    /// failures are propagated unchanged as [`DispatchError::Provider`].
    pub async fn search(
        &self,
        query: &str,
        address: Option<&str>,
        options: &CallOptions,
    ) -> Result<Vec<SearchRecord>, DispatchError> {
        let (provider, model) = self.resolve(address)?;
        provider
            .search(query, model.as_deref(), options)
            .await
            .map_err(DispatchError::Provider)
    }
}

/// Formats search results as a human-readable string.
///
/// Produces one numbered block per record in input order, blocks joined by a
/// blank line, or `"No results found."` for an empty slice.
pub fn format_results(results: &[SearchRecord]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n   {}\n   URL: {}", i + 1, r.title, r.snippet, r.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}
