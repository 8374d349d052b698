//! Test driver for the `parg-test` binary.
//!
//! Runs the binary with a given argument list and environment and captures
//! its exit status, stdout and stderr for assertions.

use std::ffi::OsStr;
use std::io;
use std::process::{Command, ExitStatus, Stdio};

/// One finished run of the driver binary.
#[derive(Debug)]
pub struct Transcript {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Transcript {
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }

    pub fn stderr_lines(&self) -> Vec<&str> {
        self.stderr.lines().collect()
    }
}

/// Run `binary` with `args` and extra environment variables.
///
/// `POSIXLY_CORRECT` and `RUST_LOG` are cleared first so the caller's
/// environment cannot leak into a run.
pub fn run<A: AsRef<OsStr>>(
    binary: &str,
    args: &[A],
    env: &[(&str, &str)],
) -> io::Result<Transcript> {
    let mut cmd = Command::new(binary);
    cmd.args(args)
        .env_remove("POSIXLY_CORRECT")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    for (k, v) in env {
        cmd.env(k, v);
    }

    let output = cmd.output()?;
    Ok(Transcript {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
