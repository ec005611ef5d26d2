//! Command-line interface.

pub mod output;

use clap::Parser;

use crate::core::config::Environment;
use crate::core::constants;
use crate::core::materialize::Materialized;
use crate::core::pipeline::Pipeline;
use crate::error::{AuthError, ConfigError, Error, Result};

/// Fetch secrets from Conjur and expose them to later pipeline steps.
///
/// All inputs are read from environment variables.
#[derive(Parser, Debug)]
#[command(
    name = "conjur-pipe",
    about = "Fetch secrets from Conjur and expose them to later pipeline steps",
    version,
    after_help = "Inputs: CONJUR_URL, CONJUR_ACCOUNT, CONJUR_SERVICE_ID, SECRETS,\n\
                  BITBUCKET_STEP_OIDC_TOKEN or CONJUR_AUTHN_LOGIN + CONJUR_AUTHN_API_KEY,\n\
                  BITBUCKET_PIPE_STORAGE_DIR, CONJUR_SSL_CERTIFICATE, DEBUG"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the pipeline against the process environment.
///
/// Uses a single-threaded runtime; the run is strictly sequential.
pub fn execute() -> Result<Materialized> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;

    let mut pipeline = Pipeline::new();
    runtime.block_on(pipeline.run(&Environment))
}

/// Report a successful run to the CI log.
pub fn report(out: &Materialized) {
    output::success(&format!(
        "Success! Wrote {} secret{}",
        out.count,
        if out.count == 1 { "" } else { "s" }
    ));
    output::kv("env file", out.env_file.display());
    output::kv("activate", format!("source {}", out.script.display()));
}

/// A follow-up hint for errors the user can fix in their configuration.
pub fn suggestion(error: &Error) -> Option<String> {
    match error {
        Error::Config(ConfigError::MissingRequiredInput(key)) => {
            Some(format!("set {} in the pipe variables", key))
        }
        Error::Auth(AuthError::InvalidAuthConfiguration(_)) => Some(format!(
            "set {} (enable oidc on the step) or both {} and {}",
            constants::INPUT_TOKEN,
            constants::INPUT_LOGIN,
            constants::INPUT_API_KEY
        )),
        Error::Validation(_) => Some(
            "secret names become variable names: use letters, digits and underscores, unique after the last '/'"
                .to_string(),
        ),
        _ => None,
    }
}
