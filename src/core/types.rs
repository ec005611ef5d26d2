//! Domain types shared across stages.

use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroizing;

/// A secret identifier as requested (e.g., `prod/db/password`).
///
/// May contain `/`-delimited path segments.
pub type SecretId = String;

/// A plaintext secret value, wiped from memory on drop.
pub type SecretValue = Zeroizing<String>;

/// Retrieved secrets keyed by their original, untruncated identifier.
///
/// `Debug` prints identifiers only.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct SecretValues(BTreeMap<SecretId, SecretValue>);

impl SecretValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one if the id was present.
    pub fn insert(&mut self, id: impl Into<SecretId>, value: SecretValue) -> Option<SecretValue> {
        self.0.insert(id.into(), value)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(id, value)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<SecretId>, V: Into<String>> FromIterator<(K, V)> for SecretValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Zeroizing::new(v.into())))
                .collect(),
        )
    }
}

impl fmt::Debug for SecretValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "[REDACTED]")))
            .finish()
    }
}
