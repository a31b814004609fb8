//! Provider registries: named backends plus a default-provider election.
//!
//! One [`ProviderRegistry`] instance exists per capability domain (generation,
//! search, embedding), each guarding its own `(map, default)` pair behind an
//! independent mutex. Registration runs during application init; dispatch runs
//! concurrently for the rest of the process lifetime. The dispatch path clones
//! the provider handle under the lock and invokes it outside, so provider I/O
//! never serializes on the registry.

pub mod address;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::DispatchError;

pub use address::ModelAddress;

/// A thread-safe store of named providers for one capability domain.
///
/// Generic over the provider trait object: see
/// [`GenerateRegistry`](crate::providers::GenerateRegistry),
/// [`SearchRegistry`](crate::providers::SearchRegistry), and
/// [`EmbeddingRegistry`](crate::providers::EmbeddingRegistry) for the three
/// domain instantiations, each of which adds its dispatch method.
///
/// The first successfully registered provider is elected default and stays
/// default for the process lifetime; later registrations never displace it.
/// Entries are never unregistered.
pub struct ProviderRegistry<P: ?Sized> {
    inner: Mutex<RegistryState<P>>,
}

struct RegistryState<P: ?Sized> {
    providers: HashMap<String, Arc<P>>,
    default: Option<String>,
}

impl<P: ?Sized> Default for ProviderRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> ProviderRegistry<P> {
    /// Creates an empty registry with no default provider.
    pub fn new() -> Self {
        ProviderRegistry {
            inner: Mutex::new(RegistryState {
                providers: HashMap::new(),
                default: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, RegistryState<P>> {
        self.inner.lock().unwrap()
    }

    /// Registers a provider under `name`, overwriting any existing entry.
    ///
    /// Valid names are non-empty, contain no `/`, and carry no leading or
    /// trailing whitespace. The first successful registration elects `name`
    /// as the registry default. Safe to call concurrently with other
    /// registrations and with dispatch, though callers are expected to finish
    /// registering before concurrent dispatch begins.
    ///
    /// # Errors
    /// [`DispatchError::InvalidProviderName`] when the name fails validation.
    pub fn register(
        &self,
        name: impl Into<String>,
        provider: Arc<P>,
    ) -> Result<(), DispatchError> {
        let name = name.into();
        validate_name(&name)?;

        let mut state = self.state();
        if state.providers.insert(name.clone(), provider).is_some() {
            log::warn!("Provider '{name}' was already registered. Overwriting.");
        }
        if state.default.is_none() {
            log::debug!("Electing '{name}' as default provider");
            state.default = Some(name);
        }
        Ok(())
    }

    /// Resolves an address string to a provider handle and model identifier.
    ///
    /// Parses `address` via [`ModelAddress::parse`], substitutes the default
    /// provider when none is named, and looks the provider up in the map. The
    /// returned `Arc` is cloned under the lock and the lock is released before
    /// this function returns, so callers invoke the provider unserialized.
    ///
    /// # Errors
    /// * [`DispatchError::InvalidAddress`] for a malformed address
    /// * [`DispatchError::NoProviderConfigured`] when no provider is named
    ///   and no default is set
    /// * [`DispatchError::UnknownProvider`] when the named provider is not
    ///   registered
    pub fn resolve(
        &self,
        address: Option<&str>,
    ) -> Result<(Arc<P>, Option<String>), DispatchError> {
        let addr = ModelAddress::parse(address)?;

        let state = self.state();
        let name = match addr.provider.or_else(|| state.default.clone()) {
            Some(name) => name,
            None => {
                return Err(DispatchError::NoProviderConfigured {
                    available: sorted_names(&state),
                });
            }
        };
        let provider = match state.providers.get(&name) {
            Some(provider) => Arc::clone(provider),
            None => {
                return Err(DispatchError::UnknownProvider {
                    name,
                    available: sorted_names(&state),
                });
            }
        };
        drop(state);

        log::debug!("Resolved provider '{name}' (model: {:?})", addr.model);
        Ok((provider, addr.model))
    }

    /// Returns the registered provider names, sorted.
    pub fn provider_names(&self) -> Vec<String> {
        sorted_names(&self.state())
    }

    /// Returns the current default provider name, if any.
    pub fn default_provider(&self) -> Option<String> {
        self.state().default.clone()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.state().providers.len()
    }

    /// Returns `true` if no provider has been registered.
    pub fn is_empty(&self) -> bool {
        self.state().providers.is_empty()
    }

    /// Clears the default provider election.
    ///
    /// Administrative escape hatch for tests and operational tooling; the
    /// normal contract never un-elects a default. Subsequent dispatch without
    /// an explicit provider fails until a new registration elects a default.
    pub fn clear_default(&self) {
        self.state().default = None;
    }
}

fn validate_name(name: &str) -> Result<(), DispatchError> {
    if name.is_empty() {
        return Err(DispatchError::InvalidProviderName {
            name: name.to_string(),
            reason: "must be a non-empty string".to_string(),
        });
    }
    if name.trim() != name {
        return Err(DispatchError::InvalidProviderName {
            name: name.to_string(),
            reason: "must not contain leading or trailing whitespace".to_string(),
        });
    }
    if name.contains('/') {
        return Err(DispatchError::InvalidProviderName {
            name: name.to_string(),
            reason: "cannot contain '/'".to_string(),
        });
    }
    Ok(())
}

fn sorted_names<P: ?Sized>(state: &RegistryState<P>) -> Vec<String> {
    let mut names: Vec<String> = state.providers.keys().cloned().collect();
    names.sort();
    names
}
