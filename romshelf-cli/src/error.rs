use thiserror::Error;

use romshelf_lib::IngestError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be read or written
    #[error("Config error: {0}")]
    Config(String),

    /// Unknown console name
    #[error("Unknown console: {0} (run 'romshelf list' to see supported consoles)")]
    UnknownConsole(String),

    /// A library operation failed before completing
    #[error("{0}")]
    Ingest(#[from] IngestError),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn unknown_console(msg: impl Into<String>) -> Self {
        Self::UnknownConsole(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
