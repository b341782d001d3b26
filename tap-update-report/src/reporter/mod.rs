//! Per-tap change reports.
//!
//! A [`Reporter`] owns one tap and the revision pair its update moved
//! between. Its report is computed at most once: the diff is extracted,
//! each record classified, and renames reconciled.

mod error;
mod migration;
mod reconcile;

pub use error::EntryError;
pub(crate) use error::log_recovered;
pub use reconcile::{confirmed_renames, reconcile_renames};

use crate::classify::Classifier;
use crate::config::{ConfigError, RevisionPair};
use crate::context::UpdateContext;
use crate::diff::parse_diff;
use crate::report::{Category, Report};
use crate::tap::Tap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Builds the change report for one tap.
#[derive(Debug)]
pub struct Reporter {
    tap: Tap,
    revisions: RevisionPair,
    report: OnceLock<Report>,
}

impl Reporter {
    /// Creates a reporter for `tap` between the given revisions.
    pub fn new(tap: Tap, revisions: RevisionPair) -> Self {
        Self {
            tap,
            revisions,
            report: OnceLock::new(),
        }
    }

    /// Creates a reporter whose revisions come from the tap's
    /// `HOMEBREW_UPDATE_BEFORE<var>` and `HOMEBREW_UPDATE_AFTER<var>`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RevisionUnset`] if either variable is missing.
    pub fn from_env(tap: Tap) -> Result<Self, ConfigError> {
        let revisions = RevisionPair::from_env(&tap.repo_var())?;
        Ok(Self::new(tap, revisions))
    }

    /// Returns the tap being reported on.
    pub fn tap(&self) -> &Tap {
        &self.tap
    }

    /// Returns the revision pair.
    pub fn revisions(&self) -> &RevisionPair {
        &self.revisions
    }

    /// Returns true if the update moved the tap.
    pub fn updated(&self) -> bool {
        self.revisions.changed()
    }

    /// Returns the report, computing it on first call.
    pub fn report(&self, ctx: &UpdateContext<'_>) -> &Report {
        self.report.get_or_init(|| self.build_report(ctx))
    }

    /// Returns the report if it has already been computed.
    pub fn cached_report(&self) -> Option<&Report> {
        self.report.get()
    }

    fn build_report(&self, ctx: &UpdateContext<'_>) -> Report {
        let mut report = Report::new();
        if !self.updated() {
            return report;
        }

        let output = match ctx.diff.diff(&self.tap, &self.revisions) {
            Ok(output) => output,
            Err(e) => {
                warn!(tap = %self.tap, error = %e, "Failed to extract diff, treating as empty");
                return report;
            }
        };

        let classifier = Classifier::new(&self.tap, ctx.loader, &self.revisions, ctx.options);
        for record in parse_diff(&output) {
            for event in classifier.classify(&record) {
                event.record(&mut report);
            }
        }

        reconcile_renames(&self.tap, &mut report);

        debug!(
            tap = %self.tap,
            modified = report.get(Category::Modified).len(),
            deleted = report.get(Category::Deleted).len(),
            casks_modified = report.get(Category::CaskModified).len(),
            casks_deleted = report.get(Category::CaskDeleted).len(),
            "Built report"
        );
        report
    }
}
