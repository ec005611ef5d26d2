//! Test support utilities for conjur-pipe integration tests.
//!
//! Provides an isolated output directory, canned inputs, and a mock
//! secret store.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod mock;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock::MockStore;

use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// Nothing touches the process environment; inputs are passed as a map
/// (library tests) or via `.env()` on the child process (CLI tests).
pub struct Test {
    /// Temporary working directory
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Output directory inside the temp dir (not created yet).
    pub fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Token-authenticated inputs requesting `secrets`, writing to `out()`.
    pub fn inputs(&self, url: &str, secrets: &str) -> HashMap<String, String> {
        let mut inputs: HashMap<String, String> = BASE_INPUTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        inputs.insert("CONJUR_URL".to_string(), url.to_string());
        inputs.insert("SECRETS".to_string(), secrets.to_string());
        inputs.insert(
            "BITBUCKET_PIPE_STORAGE_DIR".to_string(),
            self.out().display().to_string(),
        );
        inputs
    }

    /// Contents of the written env file.
    pub fn env_file(&self) -> String {
        std::fs::read_to_string(self.out().join("secrets.env")).expect("secrets.env missing")
    }

    /// Sorted lines of the written env file.
    pub fn env_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.env_file().lines().map(str::to_string).collect();
        lines.sort();
        lines
    }
}
