//! Constants used throughout the pipe.
//!
//! Centralizes input names, defaults, and output file names.

/// Secret store base address.
pub const INPUT_URL: &str = "CONJUR_URL";

/// Secret store account name.
pub const INPUT_ACCOUNT: &str = "CONJUR_ACCOUNT";

/// JWT authenticator service id.
pub const INPUT_SERVICE_ID: &str = "CONJUR_SERVICE_ID";

/// Comma-separated list of secret identifiers.
pub const INPUT_SECRETS: &str = "SECRETS";

/// OIDC token issued to the pipeline step.
pub const INPUT_TOKEN: &str = "BITBUCKET_STEP_OIDC_TOKEN";

/// Host or user login for API key authentication.
pub const INPUT_LOGIN: &str = "CONJUR_AUTHN_LOGIN";

/// API key for the login.
pub const INPUT_API_KEY: &str = "CONJUR_AUTHN_API_KEY";

/// Directory the output files are written to.
pub const INPUT_OUTPUT_DIR: &str = "BITBUCKET_PIPE_STORAGE_DIR";

/// PEM certificate to trust in addition to the system roots.
pub const INPUT_SSL_CERTIFICATE: &str = "CONJUR_SSL_CERTIFICATE";

/// Enables debug logging when set to `true`.
pub const INPUT_DEBUG: &str = "DEBUG";

/// Log filter override.
pub const LOG_ENV: &str = "CONJUR_PIPE_LOG";

/// Account used when none is configured.
pub const DEFAULT_ACCOUNT: &str = "conjur";

/// Service id used when none is configured.
pub const DEFAULT_SERVICE_ID: &str = "bitbucket";

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Environment file name (secrets.env).
pub const ENV_FILE: &str = "secrets.env";

/// Activation script name (load_secrets.sh).
pub const ACTIVATE_SCRIPT: &str = "load_secrets.sh";

/// Mode for the output directory (rwx------).
pub const DIR_MODE: u32 = 0o700;

/// Mode for the environment file (rw-------).
pub const ENV_FILE_MODE: u32 = 0o600;

/// Mode for the activation script (rwx------).
pub const SCRIPT_MODE: u32 = 0o700;
