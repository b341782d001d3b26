//! Turns diff records into typed change events.

use crate::config::RevisionPair;
use crate::context::ReportOptions;
use crate::diff::{DiffRecord, StatusCode};
use crate::external::{ExternalError, FormulaLoader};
use crate::report::{Category, Report};
use crate::reporter::{log_recovered, EntryError};
use crate::tap::{bare_name, is_definition, Tap};
use std::path::Path;
use tracing::debug;

/// A change to one package definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    FormulaAdded(String),
    FormulaDeleted(String),
    FormulaModified(String),
    FormulaRenamed { from: String, to: String },
    CaskDeleted(String),
    CaskModified(String),
}

impl ChangeEvent {
    /// Appends the event to its report category.
    ///
    /// A rename is recorded as a deletion of the old name plus an addition
    /// of the new one, to be reconciled later.
    pub fn record(self, report: &mut Report) {
        match self {
            Self::FormulaAdded(name) => report.push(Category::Added, name),
            Self::FormulaDeleted(name) => report.push(Category::Deleted, name),
            Self::FormulaModified(name) => report.push(Category::Modified, name),
            Self::FormulaRenamed { from, to } => {
                report.push(Category::Deleted, from);
                report.push(Category::Added, to);
            }
            Self::CaskDeleted(name) => report.push(Category::CaskDeleted, name),
            Self::CaskModified(name) => report.push(Category::CaskModified, name),
        }
    }
}

/// Classifies diff records of one tap.
pub struct Classifier<'a> {
    tap: &'a Tap,
    loader: &'a dyn FormulaLoader,
    revisions: &'a RevisionPair,
    options: ReportOptions,
}

impl<'a> Classifier<'a> {
    pub fn new(
        tap: &'a Tap,
        loader: &'a dyn FormulaLoader,
        revisions: &'a RevisionPair,
        options: ReportOptions,
    ) -> Self {
        Self {
            tap,
            loader,
            revisions,
            options,
        }
    }

    /// Returns the events one diff record produces, possibly none.
    pub fn classify(&self, record: &DiffRecord) -> Vec<ChangeEvent> {
        let src = record.source_path.as_path();
        let dst = record.dest_path.as_path();
        let mut events = Vec::new();

        if !is_definition(dst) {
            return events;
        }

        let paths = [src, dst];
        if paths.iter().any(|path| self.tap.is_cask_file(path)) {
            let name = bare_name(&self.tap.file_to_name(src)).to_string();
            match record.status {
                StatusCode::Deleted => events.push(ChangeEvent::CaskDeleted(name)),
                StatusCode::Modified => events.push(ChangeEvent::CaskModified(name)),
                // No added or renamed cask categories exist.
                StatusCode::Added | StatusCode::Renamed { .. } => {}
            }
        }

        if !paths.iter().any(|path| self.tap.is_formula_file(path)) {
            return events;
        }

        match record.status {
            StatusCode::Added | StatusCode::Deleted => {
                let full_name = self.tap.file_to_name(src);
                if self.tap.migrations().contains(bare_name(&full_name)) {
                    debug!(formula = %full_name, "Migrated elsewhere, not reporting");
                } else if record.status == StatusCode::Added {
                    events.push(ChangeEvent::FormulaAdded(full_name));
                } else {
                    events.push(ChangeEvent::FormulaDeleted(full_name));
                }
            }
            StatusCode::Modified => {
                let full_name = self.tap.file_to_name(src);
                if self.should_report_modified(src, &full_name) {
                    events.push(ChangeEvent::FormulaModified(full_name));
                }
            }
            StatusCode::Renamed { .. } => {
                let from = self.tap.file_to_name(src);
                let to = self.tap.file_to_name(dst);
                // Moved within the tap without a rename.
                if from != to {
                    events.push(ChangeEvent::FormulaRenamed { from, to });
                }
            }
        }

        events
    }

    /// Decides whether a modified formula changed version.
    ///
    /// Preinstall mode reports every modification. A formula that can't be
    /// loaded, or whose comparison fails, is reported as modified.
    fn should_report_modified(&self, path: &Path, full_name: &str) -> bool {
        if self.options.preinstall {
            return true;
        }

        match self.version_changed(path) {
            Ok(changed) => {
                if !changed {
                    debug!(formula = %full_name, "Version unchanged, not reporting");
                }
                changed
            }
            Err(e) if e.is_unavailable() => true,
            Err(e) => {
                log_recovered(self.options.developer, full_name, &EntryError::from(e));
                true
            }
        }
    }

    fn version_changed(&self, path: &Path) -> Result<bool, ExternalError> {
        let current = self.loader.load(self.tap, path)?.version;
        let initial = self
            .loader
            .version_at_revision(self.tap, path, self.revisions.initial())?;
        Ok(current != initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLoader;
    use crate::tap::MigrationTable;
    use tempfile::TempDir;

    fn tap_dir() -> (TempDir, Tap) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("Formula")).unwrap();
        std::fs::create_dir(dir.path().join("Casks")).unwrap();
        let tap = Tap::new("user", "tools", dir.path())
            .with_migrations(MigrationTable::from_pairs([("moved", "other/place")]));
        (dir, tap)
    }

    fn revisions() -> RevisionPair {
        RevisionPair::new("1111111", "2222222").unwrap()
    }

    fn classify(tap: &Tap, loader: &FakeLoader, preinstall: bool, line: &str) -> Vec<ChangeEvent> {
        let revisions = revisions();
        let options = ReportOptions {
            preinstall,
            ..Default::default()
        };
        let record = DiffRecord::parse(line).unwrap();
        Classifier::new(tap, loader, &revisions, options).classify(&record)
    }

    fn versions(current: &str, initial: &str) -> FakeLoader {
        let mut loader = FakeLoader::default();
        loader
            .current
            .insert("Formula/foo.rb".to_string(), current.to_string());
        loader
            .initial
            .insert("Formula/foo.rb".to_string(), initial.to_string());
        loader
    }

    #[test]
    fn suppresses_modification_without_version_change() {
        let (_dir, tap) = tap_dir();
        let events = classify(&tap, &versions("1.0", "1.0"), false, "M\tFormula/foo.rb");
        assert!(events.is_empty());
    }

    #[test]
    fn reports_version_change() {
        let (_dir, tap) = tap_dir();
        let events = classify(&tap, &versions("1.1", "1.0"), false, "M\tFormula/foo.rb");
        assert_eq!(
            events,
            [ChangeEvent::FormulaModified("user/tools/foo".to_string())]
        );
    }

    #[test]
    fn preinstall_reports_every_modification() {
        let (_dir, tap) = tap_dir();
        let events = classify(&tap, &versions("1.0", "1.0"), true, "M\tFormula/foo.rb");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unavailable_formula_is_reported() {
        let (_dir, tap) = tap_dir();
        let events = classify(&tap, &FakeLoader::default(), false, "M\tFormula/foo.rb");
        assert_eq!(
            events,
            [ChangeEvent::FormulaModified("user/tools/foo".to_string())]
        );
    }

    #[test]
    fn failed_comparison_is_reported() {
        let (_dir, tap) = tap_dir();
        let mut loader = versions("1.0", "1.0");
        loader.broken.insert("Formula/foo.rb".to_string());
        let events = classify(&tap, &loader, false, "M\tFormula/foo.rb");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn suppresses_migrated_additions_and_deletions() {
        let (_dir, tap) = tap_dir();
        let loader = FakeLoader::default();
        assert!(classify(&tap, &loader, false, "D\tFormula/moved.rb").is_empty());
        assert!(classify(&tap, &loader, false, "A\tFormula/moved.rb").is_empty());
        assert_eq!(
            classify(&tap, &loader, false, "D\tFormula/qux.rb"),
            [ChangeEvent::FormulaDeleted("user/tools/qux".to_string())]
        );
    }

    #[test]
    fn classifies_casks_by_bare_name() {
        let (_dir, tap) = tap_dir();
        let loader = FakeLoader::default();
        assert_eq!(
            classify(&tap, &loader, false, "M\tCasks/firefox.rb"),
            [ChangeEvent::CaskModified("firefox".to_string())]
        );
        assert_eq!(
            classify(&tap, &loader, false, "D\tCasks/firefox.rb"),
            [ChangeEvent::CaskDeleted("firefox".to_string())]
        );
        assert!(classify(&tap, &loader, false, "A\tCasks/firefox.rb").is_empty());
    }

    #[test]
    fn rename_becomes_delete_and_add() {
        let (_dir, tap) = tap_dir();
        let events = classify(
            &tap,
            &FakeLoader::default(),
            false,
            "R095\tFormula/old.rb\tFormula/new.rb",
        );
        assert_eq!(
            events,
            [ChangeEvent::FormulaRenamed {
                from: "user/tools/old".to_string(),
                to: "user/tools/new".to_string(),
            }]
        );

        let mut report = Report::new();
        events.into_iter().for_each(|event| event.record(&mut report));
        assert_eq!(report.get(Category::Deleted), ["user/tools/old"]);
        assert_eq!(report.get(Category::Added), ["user/tools/new"]);
    }

    #[test]
    fn move_without_rename_is_dropped() {
        let (_dir, tap) = tap_dir();
        let events = classify(&tap, &FakeLoader::default(), false, "R100\tfoo.rb\tFormula/foo.rb");
        assert!(events.is_empty());
    }

    #[test]
    fn ignores_non_definition_files() {
        let (_dir, tap) = tap_dir();
        let loader = FakeLoader::default();
        assert!(classify(&tap, &loader, false, "M\tREADME.md").is_empty());
        assert!(classify(&tap, &loader, false, "A\tcmd/brew-thing.rb").is_empty());
    }
}
