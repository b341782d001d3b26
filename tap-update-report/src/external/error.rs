//! External collaborator error types.

use crate::git::GitError;
use thiserror::Error;

/// Errors raised by formula loaders, install-state queries and executors.
#[derive(Debug, Error)]
pub enum ExternalError {
    /// The formula definition is missing or can't be loaded.
    #[error("No available formula with the name \"{name}\"")]
    FormulaUnavailable { name: String },

    /// Filesystem error.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An install receipt isn't valid JSON.
    #[error("Invalid install receipt '{path}': {source}")]
    Receipt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A command could not be started.
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A command exited unsuccessfully.
    #[error("{command} failed ({status})")]
    CommandFailed { command: String, status: String },

    /// Reading history failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

impl ExternalError {
    /// Returns true if the error only means "no definition to compare".
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::FormulaUnavailable { .. })
    }
}
