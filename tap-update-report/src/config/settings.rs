//! Installation layout settings.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default similarity floor handed to `git diff-tree -M`.
pub const DEFAULT_SIMILARITY: u8 = 85;

/// Default terminal width used for column listings.
pub const DEFAULT_COLUMNS: usize = 80;

/// Parsed contents of an `update-report.toml` file.
///
/// Every key is optional; paths that are not given are derived from
/// `prefix` (and `repository`, which itself defaults to `prefix`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct UpdateSettings {
    /// Installation prefix.
    #[serde(default = "default_prefix")]
    pub prefix: PathBuf,

    /// Checkout of the package manager itself (defaults to `prefix`).
    pub repository: Option<PathBuf>,

    /// Directory holding installed formula racks (defaults to `prefix/Cellar`).
    pub cellar: Option<PathBuf>,

    /// Directory holding installed casks (defaults to `prefix/Caskroom`).
    pub caskroom: Option<PathBuf>,

    /// Executable used for install/link/migrate actions.
    pub brew_file: Option<PathBuf>,

    /// Rename detection similarity floor, in percent.
    #[serde(default = "default_similarity")]
    pub similarity: u8,

    /// Width used when laying out name listings.
    #[serde(default = "default_columns")]
    pub columns: usize,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            repository: None,
            cellar: None,
            caskroom: None,
            brew_file: None,
            similarity: DEFAULT_SIMILARITY,
            columns: DEFAULT_COLUMNS,
        }
    }
}

pub(crate) fn default_prefix() -> PathBuf {
    PathBuf::from("/usr/local")
}

pub(crate) fn default_similarity() -> u8 {
    DEFAULT_SIMILARITY
}

pub(crate) fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

impl UpdateSettings {
    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read, isn't valid TOML,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    /// Loads settings from `path` when given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`UpdateSettings::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Overrides the installation prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: PathBuf) -> Self {
        self.prefix = prefix;
        self
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.similarity > 100 {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: format!("similarity must be a percentage, got {}", self.similarity),
            });
        }
        if self.columns == 0 {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: "columns must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the package manager checkout.
    pub fn repository(&self) -> PathBuf {
        self.repository
            .clone()
            .unwrap_or_else(|| self.prefix.clone())
    }

    /// Returns the directory that holds every tap checkout.
    pub fn taps_root(&self) -> PathBuf {
        self.repository().join("Library").join("Taps")
    }

    /// Returns the formula rack directory.
    pub fn cellar(&self) -> PathBuf {
        self.cellar
            .clone()
            .unwrap_or_else(|| self.prefix.join("Cellar"))
    }

    /// Returns the cask install directory.
    pub fn caskroom(&self) -> PathBuf {
        self.caskroom
            .clone()
            .unwrap_or_else(|| self.prefix.join("Caskroom"))
    }

    /// Returns the executable used for side effects.
    pub fn brew_file(&self) -> PathBuf {
        self.brew_file
            .clone()
            .unwrap_or_else(|| self.repository().join("bin").join("brew"))
    }
}
