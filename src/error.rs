use thiserror::Error;

/// Opaque error raised by a provider implementation.
///
/// Providers may fail in backend-specific ways (HTTP failures, quota limits,
/// malformed upstream responses). The registry never inspects these; they are
/// wrapped in [`DispatchError::Provider`] and propagated unchanged.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by registration and dispatch.
///
/// All variants are fatal to the current call: there is no fallback to another
/// provider and no local recovery. The resolution variants carry the currently
/// registered provider names so a misconfigured address is diagnosable from the
/// message alone.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The provider name failed validation at registration time.
    #[error("Invalid provider name '{name}': {reason}")]
    InvalidProviderName { name: String, reason: String },

    /// A `"provider/model"` address had an empty provider part.
    #[error("Invalid model address '{address}': provider part is empty")]
    InvalidAddress { address: String },

    /// No provider was named and no default is available.
    #[error("{}", no_provider_message(.available))]
    NoProviderConfigured { available: Vec<String> },

    /// The named provider is not registered.
    #[error("Provider '{name}' not registered. Available providers: {available:?}")]
    UnknownProvider { name: String, available: Vec<String> },

    /// A provider invocation failed; the backend error is carried verbatim.
    #[error(transparent)]
    Provider(ProviderError),

    /// A result could not be converted to or from its shared-store representation.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn no_provider_message(available: &[String]) -> String {
    if available.is_empty() {
        "No providers registered. Register a provider first.".to_string()
    } else {
        format!(
            "No default provider set and no provider specified. Available providers: {available:?}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_provider_message_distinguishes_empty_registry() {
        let err = DispatchError::NoProviderConfigured { available: vec![] };
        assert_eq!(
            err.to_string(),
            "No providers registered. Register a provider first."
        );
    }

    #[test]
    fn test_no_provider_message_lists_available() {
        let err = DispatchError::NoProviderConfigured {
            available: vec!["brave".to_string()],
        };
        assert!(err.to_string().contains("No default provider set"));
        assert!(err.to_string().contains("brave"));
    }

    #[test]
    fn test_unknown_provider_lists_available() {
        let err = DispatchError::UnknownProvider {
            name: "openai".to_string(),
            available: vec!["ollama".to_string(), "gemini".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'openai' not registered"));
        assert!(msg.contains("ollama"));
        assert!(msg.contains("gemini"));
    }

    #[test]
    fn test_provider_error_display_is_transparent() {
        let inner: ProviderError = "rate limited".into();
        let err = DispatchError::Provider(inner);
        assert_eq!(err.to_string(), "rate limited");
    }
}
