//! Secret identifier validation.
//!
//! Only the final `/`-delimited segment of an identifier becomes the
//! variable name, so names are checked after truncation:
//!
//! 1. truncate every identifier to its short name
//! 2. reject duplicate short names
//! 3. reject short names that are not valid shell variable names

use std::collections::HashSet;
use tracing::debug;

use crate::error::{Result, ValidationError};

/// The variable name for a secret identifier: everything after the last `/`.
///
/// Identifiers without a `/` are returned unchanged.
pub fn short_name(id: &str) -> &str {
    id.rsplit_once('/').map_or(id, |(_, name)| name)
}

/// Check whether a short name is a valid shell variable name.
///
/// Valid names:
/// - Only ASCII letters, digits, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Validate the requested secret identifiers.
///
/// Runs before anything is fetched. Duplicate detection covers the whole
/// list before any name is format-checked, so the reported error does not
/// depend on which identifier comes first.
///
/// # Errors
///
/// Returns `ValidationError::DuplicateSecretName` if two identifiers share a
/// short name, or `ValidationError::InvalidSecretName` with the offending
/// short name.
pub fn validate_secret_names<S: AsRef<str>>(ids: &[S]) -> Result<()> {
    let names: Vec<&str> = ids.iter().map(|id| short_name(id.as_ref())).collect();

    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if !seen.insert(*name) {
            return Err(ValidationError::DuplicateSecretName(name.to_string()).into());
        }
    }

    if let Some(name) = names.iter().find(|name| !is_valid_name(name)) {
        return Err(ValidationError::InvalidSecretName(name.to_string()).into());
    }

    debug!(count = names.len(), "secret names validated");
    Ok(())
}
