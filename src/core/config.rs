//! Configuration resolution.
//!
//! Builds a [`Config`] from named inputs (normally the process environment),
//! applying defaults for the optional ones.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::types::SecretId;
use crate::error::{ConfigError, Result};

/// A source of named inputs.
pub trait Source {
    /// Look up an input. Empty values are reported as absent.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads inputs from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct Environment;

impl Source for Environment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl Source for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).filter(|v| !v.is_empty()).cloned()
    }
}

impl Source for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }
}

/// Where and how to reach the secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Base address, e.g. `https://conjur.example.com`
    pub url: String,
    /// Account name
    pub account: String,
    /// JWT authenticator service id
    pub service_id: String,
    /// Extra PEM root certificate to trust
    pub ssl_certificate: Option<String>,
}

/// Raw authentication inputs, exactly as configured.
///
/// The authentication strategy selector consumes these and enforces that
/// exactly one mechanism is present.
#[derive(Default)]
pub struct AuthInputs {
    pub token: Option<Zeroizing<String>>,
    pub login: Option<String>,
    pub api_key: Option<Zeroizing<String>>,
}

impl fmt::Debug for AuthInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInputs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("login", &self.login)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolved pipe configuration.
#[derive(Debug)]
pub struct Config {
    pub connection: Connection,
    /// Requested secret identifiers, in input order, never empty
    pub secrets: Vec<SecretId>,
    pub auth: AuthInputs,
    /// Output directory; `None` means the default
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Resolve the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequiredInput` naming the absent input.
    pub fn from_env() -> Result<Self> {
        Self::resolve(&Environment)
    }

    /// Resolve the configuration from an arbitrary input source.
    ///
    /// `CONJUR_ACCOUNT` and `CONJUR_SERVICE_ID` fall back to defaults with a
    /// warning. `SECRETS` is split on commas and must name at least one
    /// secret. A login without an API key (or the reverse) is reported as
    /// the missing half.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequiredInput` naming the absent input.
    pub fn resolve(source: &impl Source) -> Result<Self> {
        let url = required(source, constants::INPUT_URL)?;
        let account = defaulted(source, constants::INPUT_ACCOUNT, constants::DEFAULT_ACCOUNT);
        let service_id = defaulted(
            source,
            constants::INPUT_SERVICE_ID,
            constants::DEFAULT_SERVICE_ID,
        );

        let secrets = secrets_to_list(&source.get(constants::INPUT_SECRETS).unwrap_or_default());
        if secrets.is_empty() {
            return Err(ConfigError::MissingRequiredInput(constants::INPUT_SECRETS.to_string()).into());
        }

        let login = source.get(constants::INPUT_LOGIN);
        let api_key = source.get(constants::INPUT_API_KEY).map(Zeroizing::new);
        match (&login, &api_key) {
            (Some(_), None) => {
                return Err(
                    ConfigError::MissingRequiredInput(constants::INPUT_API_KEY.to_string()).into(),
                )
            }
            (None, Some(_)) => {
                return Err(
                    ConfigError::MissingRequiredInput(constants::INPUT_LOGIN.to_string()).into(),
                )
            }
            _ => {}
        }

        let auth = AuthInputs {
            token: source.get(constants::INPUT_TOKEN).map(Zeroizing::new),
            login,
            api_key,
        };

        let config = Self {
            connection: Connection {
                url,
                account,
                service_id,
                ssl_certificate: source.get(constants::INPUT_SSL_CERTIFICATE),
            },
            secrets,
            auth,
            output_dir: source.get(constants::INPUT_OUTPUT_DIR).map(PathBuf::from),
        };

        debug!(
            url = %config.connection.url,
            account = %config.connection.account,
            service_id = %config.connection.service_id,
            secrets = config.secrets.len(),
            "configuration resolved"
        );

        Ok(config)
    }

    /// Directory the output files go to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_DIR))
    }
}

/// Split a comma-separated secret list, dropping empty elements.
///
/// `"a,,b,"` becomes `["a", "b"]` and `""` becomes `[]`.
pub fn secrets_to_list(secrets: &str) -> Vec<SecretId> {
    secrets
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether debug output was requested through the `DEBUG` input.
pub fn debug_requested(source: &impl Source) -> bool {
    source
        .get(constants::INPUT_DEBUG)
        .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn required(source: &impl Source, key: &str) -> Result<String> {
    source
        .get(key)
        .ok_or_else(|| ConfigError::MissingRequiredInput(key.to_string()).into())
}

fn defaulted(source: &impl Source, key: &str, default: &str) -> String {
    source.get(key).unwrap_or_else(|| {
        warn!("{} not set, defaulting to {:?}", key, default);
        default.to_string()
    })
}
