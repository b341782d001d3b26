//! Rename and migration tables shipped inside a tap.

use crate::tap::TapError;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::warn;

/// File holding a tap's old-name to new-name mapping.
pub const RENAMES_FILE: &str = "formula_renames.json";

/// File holding a tap's name to target-location mapping.
pub const MIGRATIONS_FILE: &str = "tap_migrations.json";

/// Reads a JSON object of string values, keeping file order.
///
/// A missing file is an empty table.
fn read_string_map(path: &Path) -> Result<Vec<(String, String)>, TapError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| TapError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_string_map(&content).map_err(|e| TapError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

fn parse_string_map(content: &str) -> Result<Vec<(String, String)>, serde_json::Error> {
    let map: Map<String, Value> = serde_json::from_str(content)?;
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(value) => Some((key, value)),
            other => {
                warn!(key = %key, value = %other, "Ignoring non-string table entry");
                None
            }
        })
        .collect())
}

/// Old bare name to new bare name, within one tap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable {
    entries: Vec<(String, String)>,
}

impl RenameTable {
    /// Builds a table from `(old, new)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }

    /// Parses a `formula_renames.json` document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `content` isn't an object.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entries: parse_string_map(content)?,
        })
    }

    /// Loads the table from a file; a missing file is an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`TapError`] if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self, TapError> {
        Ok(Self {
            entries: read_string_map(path)?,
        })
    }

    /// Returns the new name for `old`.
    pub fn new_name(&self, old: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == old)
            .map(|(_, new)| new.as_str())
    }

    /// Returns the first old name, in file order, that maps to `new`.
    pub fn old_name(&self, new: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, value)| value == new)
            .map(|(old, _)| old.as_str())
    }

    /// Iterates `(old, new)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(old, new)| (old.as_str(), new.as_str()))
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a relocated package now lives: `owner/repo[/new-name]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationTarget {
    tap: String,
    new_name: Option<String>,
}

/// A migration target resolved against the bare name being migrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMigration {
    /// Target tap, `owner/repo`.
    pub tap: String,
    /// Bare name at the target.
    pub new_name: String,
    /// Qualified name at the target, `owner/repo/name`.
    pub new_full_name: String,
}

impl MigrationTarget {
    /// Parses a target location.
    ///
    /// # Errors
    ///
    /// Returns [`TapError::InvalidTarget`] unless `target` has two or three
    /// non-empty `/` separated parts.
    pub fn parse(name: &str, target: &str) -> Result<Self, TapError> {
        let invalid = || TapError::InvalidTarget {
            name: name.to_string(),
            target: target.to_string(),
        };

        let parts: Vec<&str> = target.split('/').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [user, repo] => Ok(Self {
                tap: format!("{user}/{repo}"),
                new_name: None,
            }),
            [user, repo, new_name] => Ok(Self {
                tap: format!("{user}/{repo}"),
                new_name: Some((*new_name).to_string()),
            }),
            _ => Err(invalid()),
        }
    }

    /// Returns the target tap name.
    pub fn tap(&self) -> &str {
        &self.tap
    }

    /// Returns the explicit new name, if the package was also renamed.
    pub fn new_name(&self) -> Option<&str> {
        self.new_name.as_deref()
    }

    /// Returns true if the package moved to a cask tap.
    pub fn is_cask_tap(&self) -> bool {
        self.tap.starts_with("homebrew/cask")
    }

    /// Resolves the new names for `name`; without an explicit new name the
    /// bare name carries over unchanged.
    pub fn resolve(&self, name: &str) -> ResolvedMigration {
        let new_name = self.new_name.as_deref().unwrap_or(name).to_string();
        ResolvedMigration {
            tap: self.tap.clone(),
            new_full_name: format!("{}/{new_name}", self.tap),
            new_name,
        }
    }
}

/// Bare name to target location, within one tap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationTable {
    entries: Vec<(String, MigrationTarget)>,
}

impl MigrationTable {
    /// Builds a table from `(name, target)` pairs, skipping invalid targets.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .filter_map(|(name, target)| {
                let name = name.into();
                match MigrationTarget::parse(&name, target.as_ref()) {
                    Ok(target) => Some((name, target)),
                    Err(e) => {
                        warn!(error = %e, "Skipping migration entry");
                        None
                    }
                }
            })
            .collect();
        Self { entries }
    }

    /// Parses a `tap_migrations.json` document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `content` isn't an object.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_pairs(parse_string_map(content)?))
    }

    /// Loads the table from a file; a missing file is an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`TapError`] if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self, TapError> {
        Ok(Self::from_pairs(read_string_map(path)?))
    }

    /// Returns the target for a bare name.
    pub fn get(&self, name: &str) -> Option<&MigrationTarget> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, target)| target)
    }

    /// Returns true if `name` has migrated away.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rename_lookups_in_both_directions() {
        let table = RenameTable::from_json(r#"{"baz": "bar", "old": "new"}"#).unwrap();

        assert_eq!(table.new_name("baz"), Some("bar"));
        assert_eq!(table.old_name("bar"), Some("baz"));
        assert_eq!(table.new_name("bar"), None);
        assert_eq!(table.old_name("baz"), None);
    }

    #[test]
    fn reverse_lookup_prefers_file_order() {
        let table = RenameTable::from_json(r#"{"zeta": "same", "alpha": "same"}"#).unwrap();
        assert_eq!(table.old_name("same"), Some("zeta"));
    }

    #[test]
    fn rename_table_skips_non_strings() {
        let table = RenameTable::from_json(r#"{"a": "b", "c": 1}"#).unwrap();
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn missing_table_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let table = RenameTable::load(&temp.path().join(RENAMES_FILE)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_table_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MIGRATIONS_FILE);
        std::fs::write(&path, "[1, 2").unwrap();

        let result = MigrationTable::load(&path);
        assert!(matches!(result, Err(TapError::Json { .. })));
    }

    #[test]
    fn parses_migration_targets() {
        let plain = MigrationTarget::parse("foo", "homebrew/cask").unwrap();
        assert_eq!(plain.tap(), "homebrew/cask");
        assert_eq!(plain.new_name(), None);
        assert!(plain.is_cask_tap());

        let renamed = MigrationTarget::parse("foo", "user/tools/foo-ng").unwrap();
        assert_eq!(renamed.tap(), "user/tools");
        assert_eq!(renamed.new_name(), Some("foo-ng"));
        assert!(!renamed.is_cask_tap());

        assert!(MigrationTarget::parse("foo", "homebrew").is_err());
        assert!(MigrationTarget::parse("foo", "a/b/c/d").is_err());
        assert!(MigrationTarget::parse("foo", "a//c").is_err());
    }

    #[test]
    fn resolves_migration_names() {
        let plain = MigrationTarget::parse("foo", "user/tools").unwrap().resolve("foo");
        assert_eq!(plain.tap, "user/tools");
        assert_eq!(plain.new_name, "foo");
        assert_eq!(plain.new_full_name, "user/tools/foo");

        let renamed = MigrationTarget::parse("foo", "user/tools/bar")
            .unwrap()
            .resolve("foo");
        assert_eq!(renamed.new_name, "bar");
        assert_eq!(renamed.new_full_name, "user/tools/bar");
    }

    #[test]
    fn migration_table_drops_invalid_targets() {
        let table =
            MigrationTable::from_json(r#"{"good": "homebrew/cask", "bad": "nowhere"}"#).unwrap();

        assert!(table.contains("good"));
        assert!(!table.contains("bad"));
    }
}
