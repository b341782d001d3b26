//! Tap enumeration.

use crate::tap::{Tap, TapError};
use std::path::Path;
use tracing::{debug, info};

/// Lists every tap under `taps_root`, sorted by directory name.
///
/// The layout is `<taps_root>/<user>/homebrew-<repo>`; entries that don't
/// follow it are skipped. A missing root means no taps.
///
/// # Errors
///
/// Returns [`TapError::Io`] if a directory can't be read.
pub fn discover_taps(taps_root: &Path) -> Result<Vec<Tap>, TapError> {
    if !taps_root.is_dir() {
        debug!(path = %taps_root.display(), "No taps directory");
        return Ok(Vec::new());
    }

    let mut taps = Vec::new();
    for user_dir in sorted_subdirs(taps_root)? {
        for tap_dir in sorted_subdirs(&user_dir)? {
            match Tap::from_path(&tap_dir) {
                Some(tap) => taps.push(tap),
                None => debug!(path = %tap_dir.display(), "Skipping non-tap directory"),
            }
        }
    }

    info!(count = taps.len(), "Discovered taps");
    Ok(taps)
}

fn sorted_subdirs(path: &Path) -> Result<Vec<std::path::PathBuf>, TapError> {
    let io_error = |e| TapError::Io {
        path: path.display().to_string(),
        source: e,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            dirs.push(entry_path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn discovers_taps_in_order() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("user/homebrew-tools")).unwrap();
        fs::create_dir_all(temp.path().join("homebrew/homebrew-core")).unwrap();
        fs::create_dir_all(temp.path().join("homebrew/homebrew-cask")).unwrap();
        fs::create_dir_all(temp.path().join("homebrew/not-a-tap")).unwrap();
        fs::write(temp.path().join("stray-file"), "").unwrap();

        let taps = discover_taps(temp.path()).unwrap();
        let names: Vec<String> = taps.iter().map(Tap::name).collect();

        assert_eq!(names, vec!["homebrew/cask", "homebrew/core", "user/tools"]);
    }

    #[test]
    fn missing_root_has_no_taps() {
        let temp = TempDir::new().unwrap();
        let taps = discover_taps(&temp.path().join("Taps")).unwrap();
        assert!(taps.is_empty());
    }
}
