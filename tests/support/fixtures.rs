//! Test fixtures and constants.

/// Account used by every fixture.
pub const ACCOUNT: &str = "myaccount";

/// JWT handed to the pipe in token mode.
pub const JWT: &str = "jwt-content";

/// Access token returned by the mock authenticator.
pub const ACCESS_TOKEN: &str = r#"{"protected":"e30=","payload":"e30=","signature":"c2ln"}"#;

/// Inputs shared by every token-mode run. URL, SECRETS and the output
/// directory are filled in per test.
pub const BASE_INPUTS: &[(&str, &str)] = &[
    ("CONJUR_ACCOUNT", ACCOUNT),
    ("CONJUR_SERVICE_ID", "bitbucket"),
    ("BITBUCKET_STEP_OIDC_TOKEN", JWT),
];

/// Secrets served by the mock store.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("path/secret1", "v1"),
    ("other/path/secret2", "v2"),
    ("secret3", "value\"3"),
    ("multi/line", "first\nsecond"),
    ("shell/danger", "$HOME `id` \\ done"),
];
