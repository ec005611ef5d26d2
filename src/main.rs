//! conjur-pipe - Fetch secrets from Conjur into a CI pipeline step.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use conjur_pipe::cli::{self, output, Cli};
use conjur_pipe::core::config::{debug_requested, Environment};
use conjur_pipe::core::constants;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose || debug_requested(&Environment) {
            EnvFilter::new("conjur_pipe=debug")
        } else {
            EnvFilter::new("conjur_pipe=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli::execute() {
        Ok(out) => cli::report(&out),
        Err(e) => {
            output::error(&e.to_string());
            if let Some(hint) = cli::suggestion(&e) {
                output::hint(&hint);
            }
            std::process::exit(1);
        }
    }
}
