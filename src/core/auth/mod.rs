//! Authentication strategy selection.
//!
//! Exactly one mechanism may be configured:
//!
//! - a bearer token (the step's OIDC JWT), exchanged at the JWT authenticator
//! - a login/key pair, handed to a [`CredentialStore`] and used for direct
//!   API key authentication

mod store;

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::config::{AuthInputs, Connection};
use crate::error::{AuthError, Result};

pub use store::{CredentialStore, Credentials, Memory};

/// The configured authentication mechanism.
pub enum Authn {
    Token(Zeroizing<String>),
    Credentials(Credentials),
}

impl Authn {
    /// Pick the single configured mechanism out of the raw inputs.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidAuthConfiguration` if neither or both
    /// mechanisms are present.
    pub fn from_inputs(inputs: AuthInputs) -> Result<Self> {
        let AuthInputs {
            token,
            login,
            api_key,
        } = inputs;

        match (token, login, api_key) {
            (Some(token), None, None) => Ok(Self::Token(token)),
            (None, Some(login), Some(api_key)) => {
                Ok(Self::Credentials(Credentials::new(login, api_key)))
            }
            (None, None, None) => Err(AuthError::InvalidAuthConfiguration(
                "no authentication configured: set BITBUCKET_STEP_OIDC_TOKEN or CONJUR_AUTHN_LOGIN and CONJUR_AUTHN_API_KEY".to_string(),
            )
            .into()),
            (Some(_), _, _) => Err(AuthError::InvalidAuthConfiguration(
                "both a token and a login/API key pair are configured; set only one".to_string(),
            )
            .into()),
            (None, _, _) => Err(AuthError::InvalidAuthConfiguration(
                "a login and an API key must be configured together".to_string(),
            )
            .into()),
        }
    }
}

impl fmt::Debug for Authn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token([REDACTED])"),
            Self::Credentials(creds) => f.debug_tuple("Credentials").field(creds).finish(),
        }
    }
}

/// A constructed authentication strategy, ready for a client to use.
pub enum Strategy {
    /// Exchange a JWT at `authn-jwt/{service_id}/{account}`.
    Jwt {
        token: Zeroizing<String>,
        service_id: String,
    },
    /// Authenticate with the login/key pair held by `store` for `url`.
    ApiKey {
        store: Arc<dyn CredentialStore>,
        url: String,
    },
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jwt { .. } => "jwt",
            Self::ApiKey { .. } => "api-key",
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt { service_id, .. } => f
                .debug_struct("Jwt")
                .field("service_id", service_id)
                .finish_non_exhaustive(),
            Self::ApiKey { url, .. } => f
                .debug_struct("ApiKey")
                .field("url", url)
                .finish_non_exhaustive(),
        }
    }
}

/// Select and construct the authentication strategy for a run.
///
/// In the credential path the pair is moved into `store`; the caller's
/// inputs are consumed, so no plaintext copy outlives this call.
///
/// # Errors
///
/// Returns `AuthError::InvalidAuthConfiguration` if neither or both
/// mechanisms are configured, or a store error if the handoff fails.
pub fn select(
    inputs: AuthInputs,
    connection: &Connection,
    store: Arc<dyn CredentialStore>,
) -> Result<Strategy> {
    let strategy = match Authn::from_inputs(inputs)? {
        Authn::Token(token) => Strategy::Jwt {
            token,
            service_id: connection.service_id.clone(),
        },
        Authn::Credentials(credentials) => {
            debug!(login = %credentials.login(), "handing credentials to store");
            store.save(&connection.url, credentials)?;
            Strategy::ApiKey {
                store,
                url: connection.url.clone(),
            }
        }
    };

    info!(strategy = strategy.name(), "selected authentication strategy");
    Ok(strategy)
}
