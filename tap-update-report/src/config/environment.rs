//! Revision pairs and flags exported by the updater.

use crate::config::ConfigError;
use std::env;
use std::path::PathBuf;

const UPDATE_BEFORE: &str = "HOMEBREW_UPDATE_BEFORE";
const UPDATE_AFTER: &str = "HOMEBREW_UPDATE_AFTER";
const UPDATE_FAILED: &str = "HOMEBREW_UPDATE_FAILED";
const DISABLE_LOAD_FORMULA: &str = "HOMEBREW_DISABLE_LOAD_FORMULA";
const INSTALL_FROM_API: &str = "HOMEBREW_INSTALL_FROM_API";
const DEVELOPER: &str = "HOMEBREW_DEVELOPER";
const MISSING_REMOTE_REF_DIRS: &str = "HOMEBREW_MISSING_REMOTE_REF_DIRS";

/// The before/after revisions of one repository.
///
/// Both revisions are non-empty; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPair {
    initial: String,
    current: String,
}

impl RevisionPair {
    /// Creates a pair from explicit revisions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RevisionUnset`] naming the empty side.
    pub fn new(initial: impl Into<String>, current: impl Into<String>) -> Result<Self, ConfigError> {
        let initial = initial.into();
        let current = current.into();
        if initial.is_empty() {
            return Err(ConfigError::RevisionUnset {
                var: UPDATE_BEFORE.to_string(),
            });
        }
        if current.is_empty() {
            return Err(ConfigError::RevisionUnset {
                var: UPDATE_AFTER.to_string(),
            });
        }
        Ok(Self { initial, current })
    }

    /// Reads `HOMEBREW_UPDATE_BEFORE{suffix}` and `HOMEBREW_UPDATE_AFTER{suffix}`.
    ///
    /// An empty suffix reads the main repository's pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RevisionUnset`] naming the first missing variable.
    pub fn from_env(suffix: &str) -> Result<Self, ConfigError> {
        let initial = read_required(&format!("{UPDATE_BEFORE}{suffix}"))?;
        let current = read_required(&format!("{UPDATE_AFTER}{suffix}"))?;
        Ok(Self { initial, current })
    }

    /// Returns the revision before the update.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// Returns the revision after the update.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Returns true if the repository moved.
    pub fn changed(&self) -> bool {
        self.initial != self.current
    }
}

fn read_required(var: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::RevisionUnset {
            var: var.to_string(),
        }),
    }
}

fn flag(var: &str) -> bool {
    env::var_os(var).is_some_and(|value| !value.is_empty())
}

/// Process-wide state exported by the updater before update-report runs.
#[derive(Debug, Clone)]
pub struct UpdateEnvironment {
    /// Revisions of the package manager checkout itself.
    pub revisions: RevisionPair,

    /// The fetch step failed for at least one repository.
    pub update_failed: bool,

    /// Formula loading is disabled; nothing past the header is reported.
    pub disable_load_formula: bool,

    /// Core and cask metadata come from the API rather than tap checkouts.
    pub install_from_api: bool,

    /// Developer diagnostics are enabled.
    pub developer: bool,

    /// Tap directories whose remote branch could not be read.
    pub missing_remote_ref_dirs: Vec<PathBuf>,
}

impl UpdateEnvironment {
    /// Reads the update environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RevisionUnset`] if the main revision pair is
    /// missing, which means update-report was invoked directly.
    pub fn from_env() -> Result<Self, ConfigError> {
        let revisions = RevisionPair::from_env("")?;
        let missing_remote_ref_dirs = env::var(MISSING_REMOTE_REF_DIRS)
            .map(|dirs| {
                dirs.lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            revisions,
            update_failed: flag(UPDATE_FAILED),
            disable_load_formula: flag(DISABLE_LOAD_FORMULA),
            install_from_api: flag(INSTALL_FROM_API),
            developer: flag(DEVELOPER),
            missing_remote_ref_dirs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_rejects_empty_revisions() {
        let result = RevisionPair::new("", "abc");
        assert!(matches!(
            result,
            Err(ConfigError::RevisionUnset { ref var }) if var == "HOMEBREW_UPDATE_BEFORE"
        ));

        let result = RevisionPair::new("abc", "");
        assert!(matches!(
            result,
            Err(ConfigError::RevisionUnset { ref var }) if var == "HOMEBREW_UPDATE_AFTER"
        ));
    }

    #[test]
    fn pair_reports_change() {
        assert!(RevisionPair::new("a", "b").unwrap().changed());
        assert!(!RevisionPair::new("a", "a").unwrap().changed());
    }

    #[test]
    fn pair_from_env_with_suffix() {
        temp_env::with_vars(
            [
                ("HOMEBREW_UPDATE_BEFORE_HOMEBREW_HOMEBREW_CORE", Some("1111")),
                ("HOMEBREW_UPDATE_AFTER_HOMEBREW_HOMEBREW_CORE", Some("2222")),
            ],
            || {
                let pair = RevisionPair::from_env("_HOMEBREW_HOMEBREW_CORE").unwrap();
                assert_eq!(pair.initial(), "1111");
                assert_eq!(pair.current(), "2222");
            },
        );
    }

    #[test]
    fn pair_from_env_names_missing_variable() {
        temp_env::with_vars(
            [
                ("HOMEBREW_UPDATE_BEFORE_USER_HOMEBREW_TOOLS", Some("1111")),
                ("HOMEBREW_UPDATE_AFTER_USER_HOMEBREW_TOOLS", None),
            ],
            || {
                let err = RevisionPair::from_env("_USER_HOMEBREW_TOOLS").unwrap_err();
                assert_eq!(
                    err.to_string(),
                    "HOMEBREW_UPDATE_AFTER_USER_HOMEBREW_TOOLS is unset!"
                );
            },
        );
    }

    #[test]
    fn environment_requires_main_revisions() {
        temp_env::with_vars(
            [
                ("HOMEBREW_UPDATE_BEFORE", None::<&str>),
                ("HOMEBREW_UPDATE_AFTER", Some("abc")),
            ],
            || {
                let err = UpdateEnvironment::from_env().unwrap_err();
                assert!(err.is_revision_unset());
            },
        );
    }

    #[test]
    fn environment_reads_flags() {
        temp_env::with_vars(
            [
                ("HOMEBREW_UPDATE_BEFORE", Some("abc")),
                ("HOMEBREW_UPDATE_AFTER", Some("def")),
                ("HOMEBREW_UPDATE_FAILED", Some("1")),
                ("HOMEBREW_DISABLE_LOAD_FORMULA", None),
                ("HOMEBREW_INSTALL_FROM_API", Some("")),
                ("HOMEBREW_DEVELOPER", Some("1")),
                (
                    "HOMEBREW_MISSING_REMOTE_REF_DIRS",
                    Some("/taps/a/homebrew-b\n\n/taps/c/homebrew-d\n"),
                ),
            ],
            || {
                let env = UpdateEnvironment::from_env().unwrap();
                assert!(env.revisions.changed());
                assert!(env.update_failed);
                assert!(!env.disable_load_formula);
                assert!(!env.install_from_api);
                assert!(env.developer);
                assert_eq!(
                    env.missing_remote_ref_dirs,
                    vec![
                        PathBuf::from("/taps/a/homebrew-b"),
                        PathBuf::from("/taps/c/homebrew-d")
                    ]
                );
            },
        );
    }
}
