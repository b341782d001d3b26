//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading settings or reading the update environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in settings.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// A required revision variable is missing or empty.
    ///
    /// This is a caller contract violation: update-report must only be run
    /// by the updater, which exports both revisions.
    #[error("{var} is unset!")]
    RevisionUnset { var: String },
}

impl ConfigError {
    /// Returns true for the missing-revision precondition.
    #[must_use]
    pub fn is_revision_unset(&self) -> bool {
        matches!(self, Self::RevisionUnset { .. })
    }
}
