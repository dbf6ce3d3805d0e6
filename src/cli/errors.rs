//! CLI-specific error types
//!
//! All CLI errors are fatal: the process prints them and exits non-zero.

use std::io;

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::observability::ObservabilityError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or flag error
    #[error("{0}")]
    Config(String),

    /// I/O error (stdout, config file)
    #[error("{0}")]
    Io(String),

    /// Dataset could not be opened at start-up
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Logging could not be initialized
    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    /// Server failed to bind or crashed
    #[error("server failed: {0}")]
    Server(String),

    /// One-shot command produced a non-success envelope
    #[error("command finished with status code {code}")]
    CommandFailed { code: u16 },
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "SALES_CLI_CONFIG_ERROR",
            CliError::Io(_) => "SALES_CLI_IO_ERROR",
            CliError::Dataset(e) => e.code(),
            CliError::Observability(e) => e.code(),
            CliError::Server(_) => "SALES_CLI_SERVER_FAILED",
            CliError::CommandFailed { .. } => "SALES_CLI_COMMAND_FAILED",
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
