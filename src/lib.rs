//! conjur-pipe - Fetch secrets from Conjur into a CI pipeline step.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line entry and CI log output
//! └── core/             # Core library components
//!     ├── config        # Inputs -> Config, with defaults
//!     ├── auth/         # Token or login/key strategy, credential store
//!     ├── validation    # Short-name collision and shell-name checks
//!     ├── client/       # SecretStore trait and the Conjur client
//!     ├── retrieve      # Single batched fetch
//!     ├── env           # secrets.env format and escaping
//!     ├── materialize   # Owner-only output files and activation script
//!     └── pipeline      # Staged orchestration
//! ```
//!
//! # Output
//!
//! A successful run leaves `secrets.env` and `load_secrets.sh` in the output
//! directory. Sourcing `load_secrets.sh` exports every secret and deletes
//! `secrets.env`.

pub mod cli;
pub mod core;
pub mod error;
