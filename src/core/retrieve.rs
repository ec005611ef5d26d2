//! Batched secret retrieval.

use tracing::info;

use crate::core::client::SecretStore;
use crate::core::types::{SecretId, SecretValues};
use crate::error::Result;

/// Fetch all identifiers with a single `get_many` call.
///
/// The identifiers must already be validated. Client errors are returned
/// unchanged.
///
/// # Errors
///
/// Returns `Error::Retrieval` carrying the client's error.
pub async fn fetch_secrets<S>(client: &S, ids: &[SecretId]) -> Result<SecretValues>
where
    S: SecretStore + ?Sized,
{
    let values = client.get_many(ids).await?;
    info!(count = values.len(), "retrieved secrets");
    Ok(values)
}
