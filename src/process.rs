use std::{process::Stdio, time::Duration};

use serde::de::DeserializeOwned;
use tokio::process::Command;
use tracing::debug;

use crate::error::SourceError;

/// Runs `program args...` without a shell and returns its trimmed stdout.
///
/// The child is killed if it outlives `timeout`.
pub async fn run_captured(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, SourceError> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    debug!(%command, "Running external command");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| SourceError::Timeout {
            command: command.clone(),
            timeout,
        })?
        .map_err(|source| SourceError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(SourceError::Failed {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub fn parse_json<T: DeserializeOwned>(command: &str, stdout: &str) -> Result<T, SourceError> {
    serde_json::from_str(stdout).map_err(|source| SourceError::Malformed {
        command: command.to_string(),
        source,
    })
}
