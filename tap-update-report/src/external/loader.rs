//! Formula metadata read straight from definition files.

use crate::external::{ExternalError, FormulaInfo, FormulaLoader, PkgVersion};
use crate::git;
use crate::tap::{bare_name, Tap, CORE_TAP};
use bstr::ByteSlice;
use std::path::{Path, PathBuf};

/// Stanzas whose values make up a formula's package version.
const VERSION_STANZAS: [&str; 4] = ["url ", "version ", "revision ", "version_scheme "];

/// Keywords opening a block closed by a matching `end`.
const BLOCK_KEYWORDS: [&str; 9] = [
    "class ", "module ", "def ", "if ", "unless ", "case ", "while ", "until ", "begin",
];

/// Loads formulae without evaluating them.
///
/// A formula's version is the fingerprint of the `url`, `version`,
/// `revision` and `version_scheme` stanzas written directly in its class
/// body. Stanzas nested in `head`, `livecheck`, `resource`, `bottle` or any
/// other block don't count. Two revisions of a definition compare equal
/// exactly when none of those stanzas changed.
#[derive(Debug, Clone)]
pub struct StanzaFormulaLoader {
    taps_root: PathBuf,
}

impl StanzaFormulaLoader {
    /// Creates a loader resolving qualified names under `taps_root`.
    pub fn new(taps_root: impl Into<PathBuf>) -> Self {
        Self {
            taps_root: taps_root.into(),
        }
    }

    fn tap_for(&self, full_name: &str) -> Option<Tap> {
        let parts: Vec<&str> = full_name.split('/').collect();
        let (user, repo) = match parts.as_slice() {
            [_] => CORE_TAP.split_once('/')?,
            [user, repo, _] => (*user, *repo),
            _ => return None,
        };
        let path = self.taps_root.join(user).join(format!("homebrew-{repo}"));
        Some(Tap::new(user, repo, path))
    }
}

/// Parses the version fingerprint and keg-only flag of a definition.
pub(crate) fn parse_definition(content: &str) -> (PkgVersion, bool) {
    let mut stanzas = Vec::new();
    let mut keg_only = false;
    let mut depth = 0usize;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed == "__END__" {
            break;
        }

        // Depth 1 is the class body.
        if depth == 1 {
            if trimmed.starts_with("keg_only") {
                keg_only = true;
            }
            if VERSION_STANZAS
                .iter()
                .any(|stanza| trimmed.starts_with(stanza))
            {
                stanzas.push(trimmed.to_string());
            }
        }

        if closes_block(trimmed) {
            depth = depth.saturating_sub(1);
        } else if opens_block(trimmed) {
            depth += 1;
        }
    }

    (PkgVersion::new(stanzas.join("\n")), keg_only)
}

fn opens_block(line: &str) -> bool {
    if line.starts_with('#') {
        return false;
    }
    let code = line.split(" #").next().unwrap_or(line).trim_end();
    if code.ends_with(" end") || (code.starts_with("def ") && code.contains(" = ")) {
        return false;
    }
    BLOCK_KEYWORDS.iter().any(|keyword| code.starts_with(keyword))
        || code.ends_with(" do")
        || (code.contains(" do |") && code.ends_with('|'))
}

fn closes_block(line: &str) -> bool {
    line == "end" || line.starts_with("end ") || line.starts_with("end.")
}

fn read_definition(path: &Path, name: &str) -> Result<String, ExternalError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExternalError::FormulaUnavailable {
                name: name.to_string(),
            })
        }
        Err(e) => Err(ExternalError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

impl FormulaLoader for StanzaFormulaLoader {
    fn load(&self, tap: &Tap, path: &Path) -> Result<FormulaInfo, ExternalError> {
        let full_name = tap.file_to_name(path);
        let content = read_definition(&tap.path().join(path), &full_name)?;
        let (version, keg_only) = parse_definition(&content);
        Ok(FormulaInfo {
            full_name,
            version,
            keg_only,
        })
    }

    fn version_at_revision(
        &self,
        tap: &Tap,
        path: &Path,
        revision: &str,
    ) -> Result<PkgVersion, ExternalError> {
        let content = git::show_file(tap.path(), revision, path)?.ok_or_else(|| {
            ExternalError::FormulaUnavailable {
                name: tap.file_to_name(path),
            }
        })?;
        let (version, _) = parse_definition(&content.to_str_lossy());
        Ok(version)
    }

    fn resolve(&self, full_name: &str) -> Result<FormulaInfo, ExternalError> {
        let tap = self
            .tap_for(full_name)
            .ok_or_else(|| ExternalError::FormulaUnavailable {
                name: full_name.to_string(),
            })?;
        let path = tap.formula_path(bare_name(full_name));
        let content = read_definition(&path, full_name)?;
        let (version, keg_only) = parse_definition(&content);
        Ok(FormulaInfo {
            full_name: tap.file_to_name(&path),
            version,
            keg_only,
        })
    }
}
