//! Run summary types.

use super::result::MigrationOutcome;
use crate::report::{Category, Report};
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Whether this was a fast auto-update run.
    pub preinstall: bool,

    /// Whether the main repository moved.
    pub repository_updated: bool,

    /// Names of taps whose revisions changed.
    pub taps_updated: Vec<String>,

    /// Merged report of every updated tap.
    pub report: Report,

    /// Number of migrations that changed the installation.
    pub migrations_performed: usize,

    /// Number of migrations with nothing to do.
    pub migrations_skipped: usize,

    /// Number of migrations that failed.
    pub migrations_failed: usize,

    /// Taps whose remote default branch no longer exists.
    pub missing_remote_refs: Vec<String>,

    /// Whether the run should exit unsuccessfully.
    pub failed: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(preinstall: bool) -> Self {
        Self {
            preinstall,
            ..Default::default()
        }
    }

    /// Updates the summary with a migration outcome.
    pub fn record_outcome(&mut self, outcome: &MigrationOutcome) {
        match outcome {
            MigrationOutcome::Migrated { .. } => self.migrations_performed += 1,
            MigrationOutcome::Skipped { .. } => self.migrations_skipped += 1,
            MigrationOutcome::Failed { .. } => self.migrations_failed += 1,
        }
    }

    /// Returns true if anything was updated.
    #[must_use]
    pub fn updated(&self) -> bool {
        self.repository_updated || !self.taps_updated.is_empty()
    }

    /// Returns the number of names reported under `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.report.get(category).len()
    }

    /// Returns true if any migration failed.
    ///
    /// Migration failures are reported but don't fail the run.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.migrations_failed > 0
    }
}
