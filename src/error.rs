//! Error types for the pipe.
//!
//! Every error is fatal to a run. Nothing is retried locally; retry policy
//! belongs to the secret-store client.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by every pipeline stage.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failure reported by the secret-store client, passed through as-is.
    #[error(transparent)]
    Retrieval(#[from] ClientError),

    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("insecure permissions on {}: expected {expected}, found {actual}", .path.display())]
    Permissions {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration resolution errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required input: {0}")]
    MissingRequiredInput(String),
}

/// Authentication strategy errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid authentication configuration: {0}")]
    InvalidAuthConfiguration(String),

    #[error("credential store error: {0}")]
    CredentialStore(String),

    #[error("no credentials stored for {0}")]
    NoCredentials(String),
}

/// Secret identifier validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate secret name {}: the final portion of each secret identifier must be unique", quoted(.0))]
    DuplicateSecretName(String),

    #[error("unsupported secret name {}: variable names can only include alphanumerics and underscores, with first char being a non-digit", quoted(.0))]
    InvalidSecretName(String),
}

/// Errors raised by a secret-store client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid secret store url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid TLS certificate: {0}")]
    InvalidCertificate(String),

    #[error("request to secret store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("secret store denied access ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("secret store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("client is not authenticated")]
    NotAuthenticated,

    #[error("secret store response did not include {}", quoted(.0))]
    MissingSecret(String),

    #[error("unexpected response from secret store: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Render a name as a double-quoted string, escaping as JSON does.
fn quoted(name: &str) -> String {
    serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name))
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
