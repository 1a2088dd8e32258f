use std::time::Duration;

use thiserror::Error;

/// Why an external query produced no usable answer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("unexpected output from `{command}`: {source}")]
    Malformed {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub fn command(&self) -> &str {
        match self {
            SourceError::Spawn { command, .. }
            | SourceError::Failed { command, .. }
            | SourceError::Timeout { command, .. }
            | SourceError::Malformed { command, .. } => command,
        }
    }
}
