//! API key resolution
//!
//! The credential is looked up in a secrets store first (the OS keyring in
//! production) and then in the environment variable of the same name. Blank
//! values are treated as absent.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{ChataiError, Result};

/// Keyring service name under which credentials are stored
pub const KEYRING_SERVICE: &str = "chatai";

/// A named-secret lookup backend
pub trait SecretStore: Send + Sync {
    /// Fetch a secret, `Ok(None)` when the store has no entry for `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store (or replace) a secret
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Secrets store backed by the operating system keyring
///
/// Entries live under the [`KEYRING_SERVICE`] service with the credential
/// name as the user.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Create a store using the default service name
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Create a store using a custom service name
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = keyring::Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ChataiError::Keyring(e).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = keyring::Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        Ok(())
    }
}

/// In-memory secrets store, used by tests and embedding callers
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let secrets = self
            .secrets
            .read()
            .map_err(|_| ChataiError::Config("secret store lock poisoned".to_string()))?;
        Ok(secrets.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut secrets = self
            .secrets
            .write()
            .map_err(|_| ChataiError::Config("secret store lock poisoned".to_string()))?;
        secrets.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Resolve the API key named `name`
///
/// Order: secrets store, then environment variable `name`. A store that
/// fails to answer (no keyring daemon, locked keychain) is logged and
/// skipped rather than aborting the lookup.
///
/// # Errors
///
/// Returns [`ChataiError::MissingCredentials`] when neither source yields a
/// non-blank value.
///
/// # Examples
///
/// ```
/// use chatai::credentials::{resolve_api_key, MemorySecretStore, SecretStore};
///
/// let store = MemorySecretStore::new();
/// store.set("DOC_EXAMPLE_KEY", "secret").unwrap();
/// assert_eq!(resolve_api_key(&store, "DOC_EXAMPLE_KEY").unwrap(), "secret");
/// ```
pub fn resolve_api_key(store: &dyn SecretStore, name: &str) -> Result<String> {
    match store.get(name) {
        Ok(Some(secret)) if !secret.trim().is_empty() => {
            tracing::debug!("Resolved {} from secrets store", name);
            return Ok(secret);
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Secrets store unavailable for {}: {}", name, e);
        }
    }

    match std::env::var(name) {
        Ok(secret) if !secret.trim().is_empty() => {
            tracing::debug!("Resolved {} from environment", name);
            Ok(secret)
        }
        _ => Err(ChataiError::MissingCredentials(name.to_string()).into()),
    }
}
