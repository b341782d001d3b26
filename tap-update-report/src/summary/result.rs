//! Migration outcome types.

use crate::templates::Notice;
use serde::Serialize;

/// Result of migrating a single installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// The package now lives at its new location.
    Migrated {
        /// Bare name before the migration.
        name: String,
        /// Tap or qualified name it moved to.
        target: String,
        /// Notice to show the user, if any.
        notice: Option<Notice>,
    },

    /// Nothing was changed.
    Skipped {
        /// Bare name of the package.
        name: String,
        /// Reason for skipping.
        reason: String,
        /// Instructions for finishing the move by hand, if any.
        notice: Option<Notice>,
    },

    /// An action was attempted and failed.
    Failed {
        /// Bare name of the package.
        name: String,
        /// Error message.
        error: String,
    },
}

impl MigrationOutcome {
    pub(crate) fn skipped(name: &str, reason: &str) -> Self {
        Self::Skipped {
            name: name.to_string(),
            reason: reason.to_string(),
            notice: None,
        }
    }

    /// Returns the package name.
    pub fn name(&self) -> &str {
        match self {
            Self::Migrated { name, .. } | Self::Skipped { name, .. } | Self::Failed { name, .. } => {
                name
            }
        }
    }

    /// Returns the notice to show the user, if any.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Migrated { notice, .. } | Self::Skipped { notice, .. } => notice.as_ref(),
            Self::Failed { .. } => None,
        }
    }
}
