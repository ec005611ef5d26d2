//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::collections::HashMap;
use std::process::Output;

/// Inputs the pipe reads; cleared from the child so the host environment
/// cannot leak into a test.
const PIPE_INPUTS: &[&str] = &[
    "CONJUR_URL",
    "CONJUR_ACCOUNT",
    "CONJUR_SERVICE_ID",
    "SECRETS",
    "BITBUCKET_STEP_OIDC_TOKEN",
    "CONJUR_AUTHN_LOGIN",
    "CONJUR_AUTHN_API_KEY",
    "BITBUCKET_PIPE_STORAGE_DIR",
    "CONJUR_SSL_CERTIFICATE",
    "DEBUG",
    "CONJUR_PIPE_LOG",
];

impl Test {
    /// Create a conjur-pipe command running in the temp dir with no inputs.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("conjur-pipe").expect("failed to find conjur-pipe binary");
        for key in PIPE_INPUTS {
            cmd.env_remove(key);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run the pipe with the given inputs.
    pub fn run(&self, inputs: &HashMap<String, String>) -> Output {
        self.cmd()
            .envs(inputs)
            .output()
            .expect("failed to run conjur-pipe")
    }

    /// Run the pipe under `sh` with the given file creation mask.
    #[cfg(unix)]
    pub fn run_with_umask(&self, inputs: &HashMap<String, String>, umask: &str) -> Output {
        let mut cmd = Command::new("sh");
        for key in PIPE_INPUTS {
            cmd.env_remove(key);
        }
        cmd.env("NO_COLOR", "1")
            .current_dir(self.dir.path())
            .envs(inputs)
            .arg("-c")
            .arg(format!("umask {} && exec \"$0\"", umask))
            .arg(env!("CARGO_BIN_EXE_conjur-pipe"))
            .output()
            .expect("failed to run conjur-pipe under sh")
    }

    /// Source the activation script in `sh` from the output directory and
    /// print the named variables, one per line, followed by whether the env
    /// file still exists.
    #[cfg(unix)]
    pub fn source_and_print(&self, names: &[&str]) -> Output {
        let mut script = String::from(". ./load_secrets.sh\n");
        for name in names {
            script.push_str(&format!("printf '%s\\n' \"${}\"\n", name));
        }
        script.push_str("if [ -e secrets.env ]; then echo present; else echo removed; fi\n");

        std::process::Command::new("sh")
            .arg("-c")
            .arg(script)
            .current_dir(self.out())
            .output()
            .expect("failed to run sh")
    }
}
