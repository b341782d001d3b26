//! Recoverable per-entry failures.

use crate::external::ExternalError;
use crate::templates::TemplateError;
use tracing::{debug, error};

/// A failure confined to one package while reporting or migrating.
///
/// These never abort a run; the entry is reported or skipped and the
/// reporter moves on.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// A collaborator call failed.
    #[error(transparent)]
    External(#[from] ExternalError),

    /// A notice could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Logs a recovered failure. Developer mode surfaces it as an error with the
/// full error chain; otherwise it stays at debug level.
pub(crate) fn log_recovered(developer: bool, subject: &str, error: &EntryError) {
    if developer {
        error!(subject, error = ?error, "Recovered from failure");
    } else {
        debug!(subject, error = %error, "Recovered from failure");
    }
}
