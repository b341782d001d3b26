//! Install state read from the Cellar, the Caskroom and the taps directory.

use crate::external::{ExternalError, InstallState};
use crate::tap::bare_name;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Receipt written into every installed keg.
pub const RECEIPT_FILE: &str = "INSTALL_RECEIPT.json";

/// Filesystem-backed [`InstallState`].
#[derive(Debug, Clone)]
pub struct CellarState {
    cellar: PathBuf,
    caskroom: PathBuf,
    taps_root: PathBuf,
}

impl CellarState {
    /// Creates a view over the given directories.
    pub fn new(
        cellar: impl Into<PathBuf>,
        caskroom: impl Into<PathBuf>,
        taps_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cellar: cellar.into(),
            caskroom: caskroom.into(),
            taps_root: taps_root.into(),
        }
    }

    fn rack(&self, name: &str) -> PathBuf {
        self.cellar.join(bare_name(name))
    }

    /// Keg directories of a rack, sorted.
    fn kegs(&self, name: &str) -> Vec<PathBuf> {
        subdirs(&self.rack(name))
    }
}

fn subdirs(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn read_receipt(path: &Path) -> Result<Value, ExternalError> {
    let content = std::fs::read_to_string(path).map_err(|e| ExternalError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ExternalError::Receipt {
        path: path.display().to_string(),
        source: e,
    })
}

fn receipt_tap(receipt: &Value) -> Option<&str> {
    receipt.pointer("/source/tap").and_then(Value::as_str)
}

/// Sets `source.tap`, creating `source` if the receipt lacks it.
fn set_receipt_tap(receipt: &mut Value, tap: &str) {
    let Some(object) = receipt.as_object_mut() else {
        return;
    };
    let source = object
        .entry("source")
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    if !source.is_object() {
        *source = Value::Object(serde_json::Map::new());
    }
    if let Some(source) = source.as_object_mut() {
        source.insert("tap".to_string(), Value::String(tap.to_string()));
    }
}

impl InstallState for CellarState {
    fn is_installed(&self, name: &str) -> bool {
        self.rack(name).is_dir()
    }

    fn is_cask_installed(&self, token: &str) -> bool {
        self.caskroom.join(bare_name(token)).is_dir()
    }

    fn has_caskroom(&self) -> bool {
        self.caskroom.is_dir()
    }

    fn is_tap_installed(&self, tap: &str) -> bool {
        match tap.split_once('/') {
            Some((user, repo)) => self
                .taps_root
                .join(user)
                .join(format!("homebrew-{repo}"))
                .is_dir(),
            None => false,
        }
    }

    fn installed_tap(&self, name: &str) -> Option<String> {
        let keg = self.kegs(name).into_iter().next()?;
        match read_receipt(&keg.join(RECEIPT_FILE)) {
            Ok(receipt) => receipt_tap(&receipt).map(str::to_string),
            Err(e) => {
                debug!(keg = %keg.display(), error = %e, "Unreadable install receipt");
                None
            }
        }
    }

    fn retarget_receipts(&self, name: &str, tap: &str) -> Result<usize, ExternalError> {
        let mut changed = 0;
        for keg in self.kegs(name) {
            let path = keg.join(RECEIPT_FILE);
            if !path.exists() {
                warn!(keg = %keg.display(), "Keg has no install receipt");
                continue;
            }

            let mut receipt = read_receipt(&path)?;
            set_receipt_tap(&mut receipt, tap);
            let content =
                serde_json::to_string_pretty(&receipt).map_err(|e| ExternalError::Receipt {
                    path: path.display().to_string(),
                    source: e,
                })?;
            std::fs::write(&path, content).map_err(|e| ExternalError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            changed += 1;
        }
        Ok(changed)
    }

    /// Real, non-hidden racks holding at least one keg. Symlinked racks
    /// point at an already migrated name and are left out.
    fn installed_formulae(&self) -> Vec<String> {
        subdirs(&self.cellar)
            .iter()
            .filter(|rack| {
                std::fs::symlink_metadata(rack).is_ok_and(|metadata| metadata.is_dir())
            })
            .filter_map(|rack| rack.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.') && !self.is_rack_empty(name))
            .collect()
    }

    fn needs_migration(&self, name: &str) -> bool {
        std::fs::symlink_metadata(self.rack(name))
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    fn is_rack_empty(&self, name: &str) -> bool {
        self.kegs(name).is_empty()
    }

    fn remove_rack(&self, name: &str) -> Result<(), ExternalError> {
        let rack = self.rack(name);
        std::fs::remove_dir(&rack).map_err(|e| ExternalError::Io {
            path: rack.display().to_string(),
            source: e,
        })
    }
}
