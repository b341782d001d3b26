//! Diff extraction and parsing.

mod record;

pub use record::{parse_diff, DiffRecord, StatusCode};

use crate::config::{RevisionPair, DEFAULT_SIMILARITY};
use crate::git::{self, GitError};
use crate::tap::Tap;

/// Produces the raw name-status diff of a tap between two revisions.
pub trait DiffSource {
    /// Returns `git diff-tree --name-status` style output.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] if the diff can't be produced.
    fn diff(&self, tap: &Tap, revisions: &RevisionPair) -> Result<Vec<u8>, GitError>;
}

/// Reads diffs from the tap's git checkout.
#[derive(Debug, Clone, Copy)]
pub struct GitDiffSource {
    similarity: u8,
}

impl Default for GitDiffSource {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY)
    }
}

impl GitDiffSource {
    /// Creates a source detecting renames at `similarity` percent.
    #[must_use]
    pub fn new(similarity: u8) -> Self {
        Self { similarity }
    }
}

impl DiffSource for GitDiffSource {
    fn diff(&self, tap: &Tap, revisions: &RevisionPair) -> Result<Vec<u8>, GitError> {
        git::diff_tree(
            tap.path(),
            revisions.initial(),
            revisions.current(),
            self.similarity,
        )
    }
}
