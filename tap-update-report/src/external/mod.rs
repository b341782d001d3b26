//! Interfaces to everything the report core doesn't own.
//!
//! Formula metadata, on-disk install state and side-effecting commands are
//! reached through the [`FormulaLoader`], [`InstallState`] and [`Executor`]
//! traits. Filesystem and command-line implementations live alongside.

mod brew;
mod cellar;
mod error;
mod loader;

pub use brew::{BrewCommand, BrewExecutor};
pub use cellar::{CellarState, RECEIPT_FILE};
pub use error::ExternalError;
pub use loader::StanzaFormulaLoader;

use crate::tap::Tap;
use std::path::Path;

/// A comparable package version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PkgVersion(String);

impl PkgVersion {
    /// Wraps a version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// Returns the version string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PkgVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the report needs to know about a loaded formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaInfo {
    /// Qualified name.
    pub full_name: String,
    /// Current package version.
    pub version: PkgVersion,
    /// Keg-only formulae are never linked into the prefix.
    pub keg_only: bool,
}

/// Loads formula metadata.
pub trait FormulaLoader {
    /// Loads the formula defined at `path` (relative to the tap) as it is now.
    ///
    /// # Errors
    ///
    /// [`ExternalError::FormulaUnavailable`] if the definition can't be loaded.
    fn load(&self, tap: &Tap, path: &Path) -> Result<FormulaInfo, ExternalError>;

    /// Returns the version the definition at `path` had at `revision`.
    ///
    /// # Errors
    ///
    /// [`ExternalError::FormulaUnavailable`] if it didn't exist then.
    fn version_at_revision(
        &self,
        tap: &Tap,
        path: &Path,
        revision: &str,
    ) -> Result<PkgVersion, ExternalError>;

    /// Loads a formula by qualified name.
    ///
    /// # Errors
    ///
    /// [`ExternalError::FormulaUnavailable`] if no such formula exists.
    fn resolve(&self, full_name: &str) -> Result<FormulaInfo, ExternalError>;
}

/// Queries and updates the local installation.
pub trait InstallState {
    /// Returns true if a formula rack exists for `name` (bare or qualified).
    fn is_installed(&self, name: &str) -> bool;

    /// Returns true if the cask `token` is installed.
    fn is_cask_installed(&self, token: &str) -> bool;

    /// Returns true if casks can be installed at all.
    fn has_caskroom(&self) -> bool;

    /// Returns true if the tap `user/repo` is checked out.
    fn is_tap_installed(&self, tap: &str) -> bool;

    /// Returns the tap recorded in the install receipt of the first keg.
    fn installed_tap(&self, name: &str) -> Option<String>;

    /// Points every keg receipt of `name` at `tap`; returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalError`] if a receipt can't be read or written.
    fn retarget_receipts(&self, name: &str, tap: &str) -> Result<usize, ExternalError>;

    /// Lists installed formula racks by name, skipping hidden, empty and
    /// symlinked racks.
    fn installed_formulae(&self) -> Vec<String>;

    /// Returns true if the rack for `name` is still a real directory, i.e.
    /// it was never migrated to a new name.
    fn needs_migration(&self, name: &str) -> bool;

    /// Returns true if the rack for `name` holds no kegs.
    fn is_rack_empty(&self, name: &str) -> bool;

    /// Removes an empty rack.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalError::Io`] if the rack can't be removed.
    fn remove_rack(&self, name: &str) -> Result<(), ExternalError>;
}

/// Runs side-effecting package commands.
pub trait Executor {
    /// Checks out the tap `user/repo`.
    fn tap(&self, tap: &str) -> Result<(), ExternalError>;

    /// Installs a formula.
    fn install(&self, name: &str) -> Result<(), ExternalError>;

    /// Installs a cask.
    fn install_cask(&self, token: &str) -> Result<(), ExternalError>;

    /// Links a formula into the prefix.
    fn link(&self, name: &str, overwrite: bool) -> Result<(), ExternalError>;

    /// Unlinks a formula from the prefix.
    fn unlink(&self, name: &str) -> Result<(), ExternalError>;

    /// Uninstalls a formula.
    fn uninstall(&self, name: &str, force: bool) -> Result<(), ExternalError>;

    /// Removes stale downloads and old versions.
    fn cleanup(&self) -> Result<(), ExternalError>;

    /// Migrates an installed formula to its new name.
    fn migrate(&self, name: &str, force: bool) -> Result<(), ExternalError>;
}
