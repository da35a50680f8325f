// components/media_downloader/src/runner.rs
use crate::types::DownloadError;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Runs external tools to completion
#[async_trait]
pub trait CommandRunner {
    /// Run `program` with `args`, returning combined stdout and stderr.
    /// A non-zero exit is an error carrying that output.
    async fn run(&self, program: &Path, args: &[String]) -> Result<String, DownloadError>;
}

pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<String, DownloadError> {
        let program_name = program.display().to_string();
        tracing::debug!(program = %program_name, ?args, "running command");

        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| DownloadError::CommandSpawn {
                program: program_name.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(DownloadError::CommandFailed {
                program: program_name,
                status: output.status.to_string(),
                output: combined,
            });
        }

        Ok(combined)
    }
}
