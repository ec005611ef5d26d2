//! Secret-store client capability.
//!
//! The pipeline only depends on [`SecretStore`]. Transport, retries, and the
//! authentication handshake belong to the implementation.
//!
//! ## Adding a New Client
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file next to `conjur.rs`
//! 3. Re-export from this module

mod conjur;

use async_trait::async_trait;

use crate::core::types::{SecretId, SecretValues};
use crate::error::ClientError;

pub use conjur::Conjur;

/// An authenticated handle on a secret store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Authenticate with the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the store rejects the credentials or cannot
    /// be reached.
    async fn authenticate(&mut self) -> Result<(), ClientError>;

    /// Fetch every identifier in one batched request.
    ///
    /// The result is keyed by the identifiers exactly as passed in.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the request fails or any identifier is
    /// missing from the response.
    async fn get_many(&self, ids: &[SecretId]) -> Result<SecretValues, ClientError>;
}
