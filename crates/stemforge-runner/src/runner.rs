use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{PackerError, Result};
use crate::executor::{PackerCli, PackerExecutor};
use crate::extract::LineSink;

/// Drives one external tool invocation: stage the configuration document,
/// compose the argument list, and stream output into the caller's sink.
pub struct PackerRunner<E: PackerExecutor = PackerCli> {
    executor: E,
}

impl PackerRunner<PackerCli> {
    pub fn new() -> Self {
        Self {
            executor: PackerCli,
        }
    }
}

impl Default for PackerRunner<PackerCli> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PackerExecutor> PackerRunner<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Run `packer <command>` against `document`, passing `variables` as
    /// `-var key=value` pairs in key order.
    ///
    /// The exit status is the sole failure signal: non-zero fails the run,
    /// and no output line implies success. Callers wanting a value out of
    /// the output inspect their sink afterward.
    pub async fn run(
        &self,
        command: &str,
        document: &str,
        variables: &BTreeMap<String, String>,
        sink: &mut dyn LineSink,
    ) -> Result<()> {
        let mut config = tempfile::Builder::new()
            .prefix("packer-config")
            .suffix(".json")
            .tempfile()
            .map_err(|e| PackerError::StageConfig { source: e })?;
        config
            .write_all(document.as_bytes())
            .map_err(|e| PackerError::StageConfig { source: e })?;
        config
            .flush()
            .map_err(|e| PackerError::StageConfig { source: e })?;

        let mut args = vec![command.to_owned(), "-machine-readable".to_owned()];
        for (key, value) in variables {
            args.push("-var".to_owned());
            args.push(format!("{key}={value}"));
        }
        args.push(config.path().display().to_string());

        tracing::info!(command, variables = variables.len(), "invoking packer");
        let code = self.executor.execute(&args, sink).await?;
        tracing::debug!(code, "packer exited");
        if code != 0 {
            return Err(PackerError::BuildFailed { code });
        }
        Ok(())
    }
}
