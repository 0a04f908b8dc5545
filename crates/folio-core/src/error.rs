//! Error types for folio-core.

use thiserror::Error;

/// Result type for folio-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in folio-core.
#[derive(Debug, Error)]
pub enum Error {
    /// A code cell's source could not be parsed.
    ///
    /// Recovered locally: the cell is treated as having no statements.
    #[error("parse error in cell {cell} at {line}:{column}: {message}")]
    Parse {
        cell: usize,
        line: usize,
        column: usize,
        message: String,
    },

    /// The execution backend failed while running a required cell.
    #[error("execution failed for cell {cell}: {message}")]
    Execution { cell: usize, message: String },

    /// The execution context could not run its bootstrap import.
    #[error("execution context failed to start: {0}")]
    Bootstrap(String),

    /// Invalid configuration or arguments, reported before any mutation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IPC communication error with a worker process.
    #[error("IPC error: {0}")]
    Ipc(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether processing of the document may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Render the error with a short recovery hint for terminal output.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::Parse { .. } => "fix the cell source or mark it `//| hide`",
            Error::Execution { .. } => {
                "cells run in document order; check that earlier cells define what this one uses"
            }
            Error::Bootstrap(_) => "check `bootstrap_import` in the config and the worker's crates",
            Error::Configuration(_) => "check `--filter` patterns and the config file",
            Error::Ipc(_) => "set FOLIO_WORKER_PATH or pass `--worker <command>`",
            Error::Serialization(_) => "is the input a valid .ipynb file?",
            Error::Io(_) => return self.to_string(),
        };
        format!("{self}\n  hint: {hint}")
    }
}
