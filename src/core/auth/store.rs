//! Credential storage.
//!
//! The credential strategy hands the login/key pair to a [`CredentialStore`]
//! and keeps nothing itself. The client takes the pair back out for a
//! single authentication request, leaving the store empty.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::AuthError;

/// A login and API key pair.
///
/// The key is zeroized on drop and never printed by `Debug`.
pub struct Credentials {
    login: String,
    api_key: Zeroizing<String>,
}

impl Credentials {
    pub fn new(login: impl Into<String>, api_key: Zeroizing<String>) -> Self {
        Self {
            login: login.into(),
            api_key,
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Split into the login and the key.
    pub fn into_parts(self) -> (String, Zeroizing<String>) {
        (self.login, self.api_key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Credential storage trait.
///
/// Abstracts where a login/key pair lives between configuration and
/// authentication, keyed by secret store URL.
pub trait CredentialStore: Send + Sync {
    /// Take ownership of credentials for a URL, replacing any previous pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` if the backend cannot store them.
    fn save(&self, url: &str, credentials: Credentials) -> Result<(), AuthError>;

    /// Move the credentials for a URL out of the store.
    ///
    /// A second call for the same URL fails until the pair is saved again.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoCredentials` if nothing is stored for the URL.
    fn take(&self, url: &str) -> Result<Credentials, AuthError>;
}

/// Process-local credential store.
///
/// Entries are zeroized when taken and dropped, or when the store is dropped.
#[derive(Default)]
pub struct Memory {
    entries: Mutex<HashMap<String, Credentials>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Credentials>>, AuthError> {
        self.entries
            .lock()
            .map_err(|_| AuthError::CredentialStore("credential store lock poisoned".to_string()))
    }
}

impl CredentialStore for Memory {
    fn save(&self, url: &str, credentials: Credentials) -> Result<(), AuthError> {
        debug!(url = %url, login = %credentials.login(), "storing credentials");
        self.lock()?.insert(url.to_string(), credentials);
        Ok(())
    }

    fn take(&self, url: &str) -> Result<Credentials, AuthError> {
        self.lock()?
            .remove(url)
            .ok_or_else(|| AuthError::NoCredentials(url.to_string()))
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory").finish_non_exhaustive()
    }
}
