use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Command line is empty")]
    EmptyCommand,

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("Command '{command}' produced output that is not valid UTF-8")]
    InvalidUtf8 { command: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExporterError {
    /// Whether the failure belongs to the command itself (non-zero exit, missing
    /// binary, hang) rather than to the exporter. These degrade to empty output.
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self,
            ExporterError::Spawn { .. }
                | ExporterError::CommandFailed { .. }
                | ExporterError::Timeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
