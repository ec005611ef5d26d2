//! Secure materialization of retrieved secrets.
//!
//! Writes two files into the output directory:
//!
//! - `secrets.env`, owner read/write only, one `NAME="value"` line per secret
//! - `load_secrets.sh`, owner read/write/execute only, which exports the
//!   env file into the sourcing shell and then deletes it
//!
//! Files are opened with `create_new` and their mode bits at creation, so
//! there is never a moment where a secret file is readable by anyone else.
//! An existing file is removed first rather than truncated in place.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::constants;
use crate::core::env::EnvFile;
use crate::core::types::SecretValues;
use crate::error::{Error, Result};

/// Activation script. Source it; do not execute it.
pub const ACTIVATE_SCRIPT_BODY: &str = r#"#!/usr/bin/env sh
# Exports the fetched secrets into the current shell, then deletes them from disk.
# The env file path is only held in $1, which the sourced assignments cannot reach.
conjur_load_secrets() {
  set -a
  . "$1"
  set +a
  command -p rm -f -- "$1"
}
if [ -n "${BASH_SOURCE:-}" ]; then
  conjur_load_secrets "$(dirname -- "${BASH_SOURCE}")/secrets.env"
else
  conjur_load_secrets ./secrets.env
fi
unset -f conjur_load_secrets
"#;

/// Paths of a completed materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub dir: PathBuf,
    pub env_file: PathBuf,
    pub script: PathBuf,
    /// Number of variables written
    pub count: usize,
}

/// Write `values` and the activation script into `dir`.
///
/// The directory is created (owner-only) if missing. The env file is
/// written first; if the script cannot be written the env file is removed
/// again so no partial output is left behind.
///
/// # Errors
///
/// Returns `Error::Filesystem` if a directory or file cannot be created or
/// written, or `Error::Permissions` if the result is not owner-only.
pub fn materialize(values: &SecretValues, dir: &Path) -> Result<Materialized> {
    create_private_dir(dir)?;

    let env = EnvFile::from_secrets(values);
    let env_file = dir.join(constants::ENV_FILE);
    let script = dir.join(constants::ACTIVATE_SCRIPT);

    info!(path = %env_file.display(), count = env.len(), "writing secrets");
    write_private(&env_file, env.render().as_bytes(), constants::ENV_FILE_MODE)?;

    if let Err(e) = write_private(
        &script,
        ACTIVATE_SCRIPT_BODY.as_bytes(),
        constants::SCRIPT_MODE,
    ) {
        warn!(path = %env_file.display(), "removing env file after failed script write");
        let _ = fs::remove_file(&env_file);
        return Err(e);
    }

    debug!(path = %script.display(), "activation script written");
    Ok(Materialized {
        dir: dir.to_path_buf(),
        env_file,
        script,
        count: env.len(),
    })
}

/// Create `dir` and any missing parents with owner-only permissions.
///
/// An existing directory is left as it is.
fn create_private_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        debug!(path = %dir.display(), "output directory exists");
        return Ok(());
    }

    debug!(path = %dir.display(), "creating output directory");

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;

        fs::DirBuilder::new()
            .recursive(true)
            .mode(constants::DIR_MODE)
            .create(dir)
            .map_err(|e| Error::filesystem(dir, e))?;
        if let Err(e) = check_mode(dir, constants::DIR_MODE) {
            warn!(path = %dir.display(), "removing output directory with wrong mode");
            let _ = fs::remove_dir(dir);
            return Err(e);
        }
    }

    #[cfg(not(unix))]
    {
        fs::create_dir_all(dir).map_err(|e| Error::filesystem(dir, e))?;
    }

    Ok(())
}

/// Create `path` fresh with `mode` applied at open time and write `contents`.
///
/// Once the file exists, any later failure removes it again.
fn write_private(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "replacing existing file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::filesystem(path, e)),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(|e| Error::filesystem(path, e))?;
    let written = file
        .write_all(contents)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::filesystem(path, e));
    drop(file);

    #[cfg(unix)]
    let written = written.and_then(|()| check_mode(path, mode));

    if let Err(e) = written {
        warn!(path = %path.display(), "removing partially written file");
        let _ = fs::remove_file(path);
        return Err(e);
    }

    Ok(())
}

/// Verify that `path` carries exactly `expected` permission bits.
#[cfg(unix)]
fn check_mode(path: &Path, expected: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|e| Error::filesystem(path, e))?;
    let actual = metadata.permissions().mode() & 0o777;

    if actual != expected {
        return Err(Error::Permissions {
            path: path.to_path_buf(),
            expected: format!("{:o}", expected),
            actual: format!("{:o}", actual),
        });
    }

    Ok(())
}
