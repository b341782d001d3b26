//! Runner error types.

/// Errors that abort an update run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings or required environment are missing or invalid.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Taps could not be enumerated.
    #[error(transparent)]
    Tap(#[from] crate::tap::TapError),

    /// Writing the report failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
