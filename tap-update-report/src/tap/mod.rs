//! Taps: version-controlled collections of package definitions.
//!
//! A [`Tap`] knows where its checkout lives, which files in it are formula
//! or cask definitions, how to turn a definition path into a qualified name,
//! and the rename and migration tables it ships.

mod discovery;
mod error;
mod tables;

pub use discovery::discover_taps;
pub use error::TapError;
pub use tables::{
    MigrationTable, MigrationTarget, RenameTable, ResolvedMigration, MIGRATIONS_FILE, RENAMES_FILE,
};

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

/// Name of the default tap, whose packages are reported by bare name.
pub const CORE_TAP: &str = "homebrew/core";

/// Extension of package definition files.
pub const DEFINITION_EXTENSION: &str = "rb";

const TAP_DIR_PREFIX: &str = "homebrew-";
const CASK_DIR: &str = "Casks";
const FORMULA_DIRS: [&str; 2] = ["Formula", "HomebrewFormula"];

/// Returns the last `/` segment of a qualified name.
pub fn bare_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}

/// A tap checkout.
#[derive(Debug)]
pub struct Tap {
    user: String,
    repo: String,
    directory: String,
    path: PathBuf,
    renames: OnceLock<RenameTable>,
    migrations: OnceLock<MigrationTable>,
}

impl Tap {
    /// Creates a tap for `user/repo` checked out at `path`.
    ///
    /// `repo` is the short name, without the `homebrew-` directory prefix.
    pub fn new(user: &str, repo: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            user: user.to_string(),
            repo: repo.to_string(),
            directory: format!("{TAP_DIR_PREFIX}{repo}"),
            path: path.into(),
            renames: OnceLock::new(),
            migrations: OnceLock::new(),
        }
    }

    /// Creates a tap from a `<taps root>/<user>/homebrew-<repo>` directory.
    ///
    /// Returns `None` if `path` isn't shaped like a tap directory.
    pub fn from_path(path: &Path) -> Option<Self> {
        let directory = path.file_name()?.to_str()?;
        let user = path.parent()?.file_name()?.to_str()?;
        let repo = directory.strip_prefix(TAP_DIR_PREFIX)?;
        if user.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self::new(user, repo, path))
    }

    /// Uses `renames` instead of reading `formula_renames.json`.
    #[must_use]
    pub fn with_renames(self, renames: RenameTable) -> Self {
        Self {
            renames: OnceLock::from(renames),
            ..self
        }
    }

    /// Uses `migrations` instead of reading `tap_migrations.json`.
    #[must_use]
    pub fn with_migrations(self, migrations: MigrationTable) -> Self {
        Self {
            migrations: OnceLock::from(migrations),
            ..self
        }
    }

    /// Returns `user/repo`, lower-cased.
    pub fn name(&self) -> String {
        format!("{}/{}", self.user, self.repo).to_lowercase()
    }

    /// Returns the checkout path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true for the default tap.
    pub fn is_core(&self) -> bool {
        self.name() == CORE_TAP
    }

    /// Returns true for the default cask tap.
    pub fn is_core_cask(&self) -> bool {
        self.name() == "homebrew/cask"
    }

    /// Returns true if the checkout is a git repository.
    pub fn is_git(&self) -> bool {
        self.path.join(".git").exists()
    }

    /// Suffix of this tap's revision variables, e.g. `_HOMEBREW_HOMEBREW_CORE`.
    pub fn repo_var(&self) -> String {
        format!("/{}/{}", self.user, self.directory)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .to_uppercase()
    }

    /// Returns the rename table, reading it on first use.
    pub fn renames(&self) -> &RenameTable {
        self.renames.get_or_init(|| {
            RenameTable::load(&self.path.join(RENAMES_FILE)).unwrap_or_else(|e| {
                warn!(tap = %self.name(), error = %e, "Ignoring unreadable rename table");
                RenameTable::default()
            })
        })
    }

    /// Returns the migration table, reading it on first use.
    pub fn migrations(&self) -> &MigrationTable {
        self.migrations.get_or_init(|| {
            MigrationTable::load(&self.path.join(MIGRATIONS_FILE)).unwrap_or_else(|e| {
                warn!(tap = %self.name(), error = %e, "Ignoring unreadable migration table");
                MigrationTable::default()
            })
        })
    }

    /// Qualifies a bare name with this tap.
    pub fn qualify(&self, name: &str) -> String {
        if self.is_core() {
            name.to_string()
        } else {
            format!("{}/{name}", self.name())
        }
    }

    /// Derives the qualified name of a definition file.
    pub fn file_to_name(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        self.qualify(&stem)
    }

    /// Returns true if `path` is a formula definition.
    pub fn is_formula_file(&self, path: &Path) -> bool {
        let relative = self.relative(path);
        if !is_definition(&relative) || relative.starts_with(CASK_DIR) {
            return false;
        }
        match self.formula_dir() {
            Some(dir) => relative.starts_with(dir),
            None => relative
                .parent()
                .map_or(true, |parent| parent.as_os_str().is_empty()),
        }
    }

    /// Returns true if `path` is a cask definition.
    pub fn is_cask_file(&self, path: &Path) -> bool {
        let relative = self.relative(path);
        is_definition(&relative) && relative.starts_with(CASK_DIR)
    }

    /// Returns the path to a formula definition by bare name.
    pub fn formula_path(&self, name: &str) -> PathBuf {
        let file = format!("{name}.{DEFINITION_EXTENSION}");
        match self.formula_dir() {
            Some(dir) => self.path.join(dir).join(file),
            None => self.path.join(file),
        }
    }

    /// The directory formulae live in, or `None` for taps keeping them at the root.
    fn formula_dir(&self) -> Option<&'static str> {
        FORMULA_DIRS
            .into_iter()
            .find(|dir| self.path.join(dir).is_dir())
            .or_else(|| self.is_core().then_some(FORMULA_DIRS[0]))
    }

    /// Makes `path` relative to the checkout.
    ///
    /// Accepts absolute paths inside the checkout and paths that start with
    /// this tap's `<user>/homebrew-<repo>` directories.
    fn relative<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        if let Ok(stripped) = path.strip_prefix(&self.path) {
            return Cow::Borrowed(stripped);
        }

        let mut components = path.components();
        let leading: Vec<Component<'_>> = components.by_ref().take(2).collect();
        let matches_tap_dirs = match leading.as_slice() {
            [Component::Normal(user), Component::Normal(dir)] => {
                user.to_string_lossy().eq_ignore_ascii_case(&self.user)
                    && dir.to_string_lossy().eq_ignore_ascii_case(&self.directory)
            }
            _ => false,
        };
        if matches_tap_dirs {
            Cow::Owned(components.as_path().to_path_buf())
        } else {
            Cow::Borrowed(path)
        }
    }
}

pub(crate) fn is_definition(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == DEFINITION_EXTENSION)
}

impl std::fmt::Display for Tap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
