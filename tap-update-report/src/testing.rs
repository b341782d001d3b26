//! In-memory collaborators for unit tests.

use crate::config::RevisionPair;
use crate::context::{ReportOptions, UpdateContext};
use crate::diff::DiffSource;
use crate::external::{
    Executor, ExternalError, FormulaInfo, FormulaLoader, InstallState, PkgVersion,
};
use crate::git::GitError;
use crate::tap::Tap;
use crate::templates::TemplateRenderer;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Default)]
pub(crate) struct FakeDiff {
    pub output: String,
    pub calls: Cell<usize>,
}

impl FakeDiff {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            calls: Cell::new(0),
        }
    }
}

impl DiffSource for FakeDiff {
    fn diff(&self, _tap: &Tap, _revisions: &RevisionPair) -> Result<Vec<u8>, GitError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.output.clone().into_bytes())
    }
}

/// Versions keyed by definition path.
#[derive(Default)]
pub(crate) struct FakeLoader {
    pub current: HashMap<String, String>,
    pub initial: HashMap<String, String>,
    pub broken: HashSet<String>,
    pub keg_only: HashSet<String>,
}

impl FormulaLoader for FakeLoader {
    fn load(&self, _tap: &Tap, path: &Path) -> Result<FormulaInfo, ExternalError> {
        let key = path.to_string_lossy().into_owned();
        if self.broken.contains(&key) {
            return Err(ExternalError::CommandFailed {
                command: format!("load {key}"),
                status: "exit status: 1".to_string(),
            });
        }
        let version = self
            .current
            .get(&key)
            .ok_or_else(|| ExternalError::FormulaUnavailable { name: key.clone() })?;
        Ok(FormulaInfo {
            full_name: key.clone(),
            version: PkgVersion::new(version.clone()),
            keg_only: false,
        })
    }

    fn version_at_revision(
        &self,
        _tap: &Tap,
        path: &Path,
        _revision: &str,
    ) -> Result<PkgVersion, ExternalError> {
        let key = path.to_string_lossy().into_owned();
        self.initial
            .get(&key)
            .map(|version| PkgVersion::new(version.clone()))
            .ok_or(ExternalError::FormulaUnavailable { name: key })
    }

    fn resolve(&self, full_name: &str) -> Result<FormulaInfo, ExternalError> {
        if self.broken.contains(full_name) {
            return Err(ExternalError::FormulaUnavailable {
                name: full_name.to_string(),
            });
        }
        Ok(FormulaInfo {
            full_name: full_name.to_string(),
            version: PkgVersion::new("1.0"),
            keg_only: self.keg_only.contains(full_name),
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub formulae: HashSet<String>,
    pub casks: HashSet<String>,
    pub taps: HashSet<String>,
    pub caskroom: bool,
    pub installed_from: HashMap<String, String>,
    pub unmigrated_racks: Vec<String>,
    pub empty_racks: HashSet<String>,
    pub retargeted: RefCell<Vec<(String, String)>>,
    pub removed_racks: RefCell<Vec<String>>,
}

impl InstallState for FakeState {
    fn is_installed(&self, name: &str) -> bool {
        self.formulae.contains(crate::tap::bare_name(name))
    }

    fn is_cask_installed(&self, token: &str) -> bool {
        self.casks.contains(token)
    }

    fn has_caskroom(&self) -> bool {
        self.caskroom
    }

    fn is_tap_installed(&self, tap: &str) -> bool {
        self.taps.contains(tap)
    }

    fn installed_tap(&self, name: &str) -> Option<String> {
        self.installed_from.get(name).cloned()
    }

    fn retarget_receipts(&self, name: &str, tap: &str) -> Result<usize, ExternalError> {
        self.retargeted
            .borrow_mut()
            .push((name.to_string(), tap.to_string()));
        Ok(1)
    }

    fn installed_formulae(&self) -> Vec<String> {
        let mut names: Vec<String> = self.formulae.iter().cloned().collect();
        names.extend(self.unmigrated_racks.iter().cloned());
        names.retain(|name| !self.empty_racks.contains(name));
        names.sort();
        names.dedup();
        names
    }

    fn needs_migration(&self, name: &str) -> bool {
        self.unmigrated_racks.iter().any(|rack| rack == name)
    }

    fn is_rack_empty(&self, name: &str) -> bool {
        self.empty_racks.contains(name)
    }

    fn remove_rack(&self, name: &str) -> Result<(), ExternalError> {
        self.removed_racks.borrow_mut().push(name.to_string());
        Ok(())
    }
}

/// Records every command; commands listed in `failing` return an error.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    pub calls: RefCell<Vec<String>>,
    pub failing: HashSet<String>,
}

impl RecordingExecutor {
    fn record(&self, command: String) -> Result<(), ExternalError> {
        self.calls.borrow_mut().push(command.clone());
        if self.failing.contains(&command) {
            return Err(ExternalError::CommandFailed {
                command,
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn tap(&self, tap: &str) -> Result<(), ExternalError> {
        self.record(format!("tap {tap}"))
    }

    fn install(&self, name: &str) -> Result<(), ExternalError> {
        self.record(format!("install {name}"))
    }

    fn install_cask(&self, token: &str) -> Result<(), ExternalError> {
        self.record(format!("install --cask {token}"))
    }

    fn link(&self, name: &str, overwrite: bool) -> Result<(), ExternalError> {
        let flag = if overwrite { " --overwrite" } else { "" };
        self.record(format!("link{flag} {name}"))
    }

    fn unlink(&self, name: &str) -> Result<(), ExternalError> {
        self.record(format!("unlink {name}"))
    }

    fn uninstall(&self, name: &str, force: bool) -> Result<(), ExternalError> {
        let flag = if force { " --force" } else { "" };
        self.record(format!("uninstall{flag} {name}"))
    }

    fn cleanup(&self) -> Result<(), ExternalError> {
        self.record("cleanup".to_string())
    }

    fn migrate(&self, name: &str, force: bool) -> Result<(), ExternalError> {
        let flag = if force { " --force" } else { "" };
        self.record(format!("migrate{flag} {name}"))
    }
}

/// Owns one of each fake so tests can borrow an [`UpdateContext`].
#[derive(Default)]
pub(crate) struct Fixture {
    pub diff: FakeDiff,
    pub loader: FakeLoader,
    pub state: FakeState,
    pub executor: RecordingExecutor,
    pub renderer: TemplateRenderer,
    pub options: ReportOptions,
}

impl Fixture {
    pub fn ctx(&self) -> UpdateContext<'_> {
        UpdateContext {
            diff: &self.diff,
            loader: &self.loader,
            state: &self.state,
            executor: &self.executor,
            renderer: &self.renderer,
            options: self.options,
        }
    }
}
