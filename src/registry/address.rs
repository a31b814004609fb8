use crate::error::DispatchError;

/// An ephemeral `(provider, model)` pair parsed from a raw address string.
///
/// Addresses take the form `"provider/model"`, `"provider/"` (provider only),
/// or a bare `"model"` (provider chosen by default election). Parsed at call
/// time, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAddress {
    /// Explicitly requested provider, if the address named one.
    pub provider: Option<String>,
    /// Model identifier forwarded to the provider, if any.
    pub model: Option<String>,
}

impl ModelAddress {
    /// Parses a raw address string.
    ///
    /// Splits once on the first `/`: the left part selects the provider, the
    /// right part is the model identifier. Without a `/` the whole string is
    /// the model and the provider is left to default election. Empty model
    /// segments normalize to `None`, so providers see `Option<&str>` and
    /// never `Some("")`.
    ///
    /// # Errors
    /// [`DispatchError::InvalidAddress`] when the provider part is empty
    /// (e.g. `"/gpt-4o"`).
    pub fn parse(raw: Option<&str>) -> Result<Self, DispatchError> {
        let raw = match raw {
            Some(s) => s,
            None => {
                return Ok(ModelAddress {
                    provider: None,
                    model: None,
                });
            }
        };

        if let Some((provider, model)) = raw.split_once('/') {
            if provider.is_empty() {
                return Err(DispatchError::InvalidAddress {
                    address: raw.to_string(),
                });
            }
            Ok(ModelAddress {
                provider: Some(provider.to_string()),
                model: (!model.is_empty()).then(|| model.to_string()),
            })
        } else {
            Ok(ModelAddress {
                provider: None,
                model: (!raw.is_empty()).then(|| raw.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_and_model() {
        let addr = ModelAddress::parse(Some("openai/gpt-4o")).unwrap();
        assert_eq!(addr.provider.as_deref(), Some("openai"));
        assert_eq!(addr.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_parse_splits_on_first_slash_only() {
        let addr = ModelAddress::parse(Some("hf/org/model-v2")).unwrap();
        assert_eq!(addr.provider.as_deref(), Some("hf"));
        assert_eq!(addr.model.as_deref(), Some("org/model-v2"));
    }

    #[test]
    fn test_parse_bare_model() {
        let addr = ModelAddress::parse(Some("gpt-4o")).unwrap();
        assert_eq!(addr.provider, None);
        assert_eq!(addr.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_parse_provider_only() {
        let addr = ModelAddress::parse(Some("brave/")).unwrap();
        assert_eq!(addr.provider.as_deref(), Some("brave"));
        assert_eq!(addr.model, None);
    }

    #[test]
    fn test_parse_absent() {
        let addr = ModelAddress::parse(None).unwrap();
        assert_eq!(addr.provider, None);
        assert_eq!(addr.model, None);
    }

    #[test]
    fn test_parse_empty_string_normalizes_to_absent() {
        let addr = ModelAddress::parse(Some("")).unwrap();
        assert_eq!(addr.provider, None);
        assert_eq!(addr.model, None);
    }

    #[test]
    fn test_parse_empty_provider_part_fails() {
        let err = ModelAddress::parse(Some("/gpt-4o")).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidAddress { .. }));
        assert!(err.to_string().contains("/gpt-4o"));
    }
}
