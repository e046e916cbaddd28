//! External command seam.
//!
//! All `lsblk`/`udisksctl` invocations go through [`CommandRunner`], so probe
//! and controller behaviour can be exercised with in-memory fakes.

use std::io;

use async_trait::async_trait;
use tokio::process::Command;

/// Captured result of an external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

/// Runs an external command to completion and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, waiting for it to exit.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while spawning or collecting the process.
    /// A non-zero exit status is not an error here; it is reported through
    /// [`CommandOutput::success`].
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output().await?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
