//! Git invocation error types.

use thiserror::Error;

/// Errors that can occur while running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// git could not be started.
    #[error("Failed to execute git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    /// git exited unsuccessfully.
    #[error("git {args} failed ({status}): {stderr}")]
    Failed {
        args: String,
        status: String,
        stderr: String,
    },
}
