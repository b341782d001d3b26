//! Side effects through the `brew` executable.

use crate::external::{Executor, ExternalError};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::info;

/// A package command issued during migrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewCommand {
    Tap { tap: String },
    Install { name: String },
    InstallCask { token: String },
    Link { name: String, overwrite: bool },
    Unlink { name: String },
    Uninstall { name: String, force: bool },
    Cleanup,
    Migrate { name: String, force: bool },
}

impl BrewCommand {
    /// Returns the command-line arguments.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            Self::Tap { tap } => args.extend(["tap".into(), tap.clone()]),
            Self::Install { name } => args.extend(["install".into(), name.clone()]),
            Self::InstallCask { token } => {
                args.extend(["install".into(), "--cask".into(), token.clone()]);
            }
            Self::Link { name, overwrite } => {
                args.extend(["link".into(), name.clone()]);
                if *overwrite {
                    args.push("--overwrite".into());
                }
            }
            Self::Unlink { name } => args.extend(["unlink".into(), name.clone()]),
            Self::Uninstall { name, force } => {
                args.push("uninstall".into());
                if *force {
                    args.push("--force".into());
                }
                args.push(name.clone());
            }
            Self::Cleanup => args.push("cleanup".into()),
            Self::Migrate { name, force } => {
                args.push("migrate".into());
                if *force {
                    args.push("--force".into());
                }
                args.push(name.clone());
            }
        }
        args
    }
}

impl std::fmt::Display for BrewCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "brew {}", self.args().join(" "))
    }
}

/// Runs [`BrewCommand`]s with the configured executable, blocking until
/// each one exits.
#[derive(Debug, Clone)]
pub struct BrewExecutor {
    brew_file: PathBuf,
}

impl BrewExecutor {
    /// Creates an executor for `brew_file`.
    pub fn new(brew_file: impl Into<PathBuf>) -> Self {
        Self {
            brew_file: brew_file.into(),
        }
    }

    /// Runs one command, inheriting stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalError`] if the command can't start or fails.
    pub fn run(&self, command: &BrewCommand) -> Result<(), ExternalError> {
        info!(command = %command, "Running");

        let status = Command::new(&self.brew_file)
            .args(command.args())
            .stdin(Stdio::null())
            .status()
            .map_err(|e| ExternalError::Spawn {
                command: command.to_string(),
                source: e,
            })?;

        if !status.success() {
            return Err(ExternalError::CommandFailed {
                command: command.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl Executor for BrewExecutor {
    fn tap(&self, tap: &str) -> Result<(), ExternalError> {
        self.run(&BrewCommand::Tap {
            tap: tap.to_string(),
        })
    }

    fn install(&self, name: &str) -> Result<(), ExternalError> {
        self.run(&BrewCommand::Install {
            name: name.to_string(),
        })
    }

    fn install_cask(&self, token: &str) -> Result<(), ExternalError> {
        self.run(&BrewCommand::InstallCask {
            token: token.to_string(),
        })
    }

    fn link(&self, name: &str, overwrite: bool) -> Result<(), ExternalError> {
        self.run(&BrewCommand::Link {
            name: name.to_string(),
            overwrite,
        })
    }

    fn unlink(&self, name: &str) -> Result<(), ExternalError> {
        self.run(&BrewCommand::Unlink {
            name: name.to_string(),
        })
    }

    fn uninstall(&self, name: &str, force: bool) -> Result<(), ExternalError> {
        self.run(&BrewCommand::Uninstall {
            name: name.to_string(),
            force,
        })
    }

    fn cleanup(&self) -> Result<(), ExternalError> {
        self.run(&BrewCommand::Cleanup)
    }

    fn migrate(&self, name: &str, force: bool) -> Result<(), ExternalError> {
        self.run(&BrewCommand::Migrate {
            name: name.to_string(),
            force,
        })
    }
}
