//! In-memory secret store for pipeline tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use conjur_pipe::core::client::SecretStore;
use conjur_pipe::core::types::{SecretId, SecretValues};
use conjur_pipe::error::ClientError;

/// A secret store that serves fixed values and counts calls.
#[derive(Clone, Default)]
pub struct MockStore {
    values: HashMap<String, String>,
    reject_auth: bool,
    fail_fetch: Option<u16>,
    authenticated: bool,
    auth_calls: Arc<AtomicUsize>,
    fetch_calls: Arc<AtomicUsize>,
    requested: Arc<Mutex<Vec<Vec<SecretId>>>>,
}

impl MockStore {
    pub fn with_secrets(secrets: &[(&str, &str)]) -> Self {
        Self {
            values: secrets
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    /// Reject authentication with a 401.
    pub fn rejecting_auth(mut self) -> Self {
        self.reject_auth = true;
        self
    }

    /// Fail every fetch with the given HTTP status.
    pub fn failing_fetch(mut self, status: u16) -> Self {
        self.fail_fetch = Some(status);
        self
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Identifier lists passed to each `get_many` call.
    pub fn requested(&self) -> Vec<Vec<SecretId>> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for MockStore {
    async fn authenticate(&mut self) -> Result<(), ClientError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_auth {
            return Err(ClientError::Unauthorized {
                status: 401,
                message: "Authentication failed".to_string(),
            });
        }
        self.authenticated = true;
        Ok(())
    }

    async fn get_many(&self, ids: &[SecretId]) -> Result<SecretValues, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(ids.to_vec());

        if !self.authenticated {
            return Err(ClientError::NotAuthenticated);
        }
        if let Some(status) = self.fail_fetch {
            return Err(ClientError::Status {
                status,
                message: "simulated transport failure".to_string(),
            });
        }

        ids.iter()
            .map(|id| {
                self.values
                    .get(id)
                    .map(|v| (id.clone(), v.clone()))
                    .ok_or_else(|| ClientError::MissingSecret(id.clone()))
            })
            .collect()
    }
}
