//! Helpers for driving the compiled `dirsweep` binary.

use std::process::{Command, ExitStatus};

/// Captured streams of one `dirsweep` invocation.
pub struct SweepOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl SweepOutput {
    /// Parse stdout as JSON, panicking with both streams on failure so the
    /// assertion message carries what the binary actually printed.
    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|err| {
            panic!(
                "stdout is not JSON ({err})\n--- stdout ---\n{}\n--- stderr ---\n{}",
                self.stdout, self.stderr
            )
        })
    }
}

/// Run the binary with the given arguments and no extra environment.
pub fn dirsweep(args: &[&str]) -> SweepOutput {
    dirsweep_with_env(args, &[])
}

/// Run the binary with arguments plus environment overrides. Any `DSW_*`
/// variable inherited from the test runner is scrubbed first so a case only
/// sees the overrides it sets itself.
pub fn dirsweep_with_env(args: &[&str], env: &[(&str, &str)]) -> SweepOutput {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dirsweep"));
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("DSW_") {
            cmd.env_remove(&key);
        }
    }
    cmd.args(args).envs(env.iter().copied());

    let output = cmd.output().expect("spawn dirsweep binary");
    SweepOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
