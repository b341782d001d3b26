//! Tap error types.

use thiserror::Error;

/// Errors that can occur while reading taps and their tables.
#[derive(Debug, Error)]
pub enum TapError {
    /// Failed to read a file or directory.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A table file is not valid JSON.
    #[error("Failed to parse '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A migration table entry doesn't name a target tap.
    #[error("Invalid migration target '{target}' for '{name}'")]
    InvalidTarget { name: String, target: String },
}
