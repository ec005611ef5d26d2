//! Pipeline orchestration.
//!
//! A run moves through a fixed sequence of stages:
//!
//! ```text
//! Configuring -> Authenticating -> Validating -> Fetching -> Writing -> Done
//!       \______________\_______________\____________\__________\-> Failed
//! ```
//!
//! `Writing` can only be entered from `Fetching`, which can only be entered
//! from `Validating`, so nothing is fetched or written for a request that
//! failed validation.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::core::auth::{self, Memory, Strategy};
use crate::core::client::{Conjur, SecretStore};
use crate::core::config::{Config, Connection, Source};
use crate::core::materialize::{materialize, Materialized};
use crate::core::retrieve::fetch_secrets;
use crate::core::validation::validate_secret_names;
use crate::error::{Error, Result};

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuring,
    Authenticating,
    Validating,
    Fetching,
    Writing,
    Done,
    Failed,
}

impl Stage {
    /// The stage that follows this one on success.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Configuring => Some(Stage::Authenticating),
            Stage::Authenticating => Some(Stage::Validating),
            Stage::Validating => Some(Stage::Fetching),
            Stage::Fetching => Some(Stage::Writing),
            Stage::Writing => Some(Stage::Done),
            Stage::Done | Stage::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuring => "configuring",
            Stage::Authenticating => "authenticating",
            Stage::Validating => "validating",
            Stage::Fetching => "fetching",
            Stage::Writing => "writing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Drives one run and records the stages it passed through.
#[derive(Debug)]
pub struct Pipeline {
    stage: Stage,
    history: Vec<Stage>,
    failed_at: Option<Stage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            stage: Stage::Configuring,
            history: vec![Stage::Configuring],
            failed_at: None,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every stage entered so far, in order.
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// The stage that was active when the run failed.
    pub fn failed_at(&self) -> Option<Stage> {
        self.failed_at
    }

    /// Run against the real secret store using inputs from `source`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage.
    pub async fn run(&mut self, source: &impl Source) -> Result<Materialized> {
        self.run_with(source, |connection, strategy| {
            Conjur::new(connection, strategy).map_err(Error::from)
        })
        .await
    }

    /// Run with a caller-supplied client constructor.
    ///
    /// `connect` receives the resolved connection and the selected strategy
    /// and returns an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage.
    pub async fn run_with<S, F>(&mut self, source: &impl Source, connect: F) -> Result<Materialized>
    where
        S: SecretStore,
        F: FnOnce(&Connection, Strategy) -> Result<S>,
    {
        match self.execute(source, connect).await {
            Ok(out) => {
                self.advance(Stage::Done);
                info!(count = out.count, dir = %out.dir.display(), "pipeline complete");
                Ok(out)
            }
            Err(e) => {
                self.failed_at = Some(self.stage);
                error!(stage = %self.stage, "pipeline failed");
                self.stage = Stage::Failed;
                self.history.push(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn execute<S, F>(&mut self, source: &impl Source, connect: F) -> Result<Materialized>
    where
        S: SecretStore,
        F: FnOnce(&Connection, Strategy) -> Result<S>,
    {
        let config = Config::resolve(source)?;
        let output_dir = config.output_dir();
        let Config {
            connection,
            secrets,
            auth,
            ..
        } = config;

        self.advance(Stage::Authenticating);
        let strategy = auth::select(auth, &connection, Arc::new(Memory::new()))?;
        let mut client = connect(&connection, strategy)?;
        client.authenticate().await?;
        info!(url = %connection.url, account = %connection.account, "authenticated");

        self.advance(Stage::Validating);
        validate_secret_names(&secrets)?;

        self.advance(Stage::Fetching);
        let values = fetch_secrets(&client, &secrets).await?;

        self.advance(Stage::Writing);
        materialize(&values, &output_dir)
    }

    fn advance(&mut self, to: Stage) {
        debug_assert_eq!(
            self.stage.next(),
            Some(to),
            "invalid stage transition {} -> {}",
            self.stage,
            to
        );
        debug!(from = %self.stage, to = %to, "stage transition");
        self.stage = to;
        self.history.push(to);
    }
}
