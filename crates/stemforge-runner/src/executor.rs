use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::PackerError;
use crate::extract::LineSink;

/// Abstraction over the external tool invocation for testability.
///
/// Production code uses [`PackerCli`], tests substitute scripted executors.
#[allow(async_fn_in_trait)]
pub trait PackerExecutor: Send + Sync {
    /// Run the tool with `args`, pushing each stdout line into `sink` as it
    /// arrives, and return the process exit code.
    async fn execute(&self, args: &[String], sink: &mut dyn LineSink)
    -> Result<i32, PackerError>;
}

/// Real `packer` CLI executor.
///
/// stdout is consumed line by line so progress surfaces during builds that
/// run for hours; stderr passes straight through to the terminal.
pub struct PackerCli;

impl PackerExecutor for PackerCli {
    async fn execute(
        &self,
        args: &[String],
        sink: &mut dyn LineSink,
    ) -> Result<i32, PackerError> {
        let mut child = tokio::process::Command::new("packer")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| PackerError::NotFound { source: e })?;

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| PackerError::OutputRead { source: e })?
            {
                sink.line(&line);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| PackerError::Wait { source: e })?;
        Ok(status.code().unwrap_or(-1))
    }
}
