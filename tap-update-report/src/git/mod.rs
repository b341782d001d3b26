//! Thin wrappers over the git command line.
//!
//! Output is handled as raw bytes; paths in a diff are not guaranteed to be
//! UTF-8. Diffs disable `core.quotePath` so such paths arrive unescaped.

mod error;

pub use error::GitError;

use bstr::ByteSlice;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs git in `repo` and returns its standard output.
///
/// # Errors
///
/// Returns [`GitError`] if git can't be started or exits unsuccessfully.
pub fn git_output(repo: &Path, args: &[&str]) -> Result<Vec<u8>, GitError> {
    debug!(repo = %repo.display(), args = %args.join(" "), "Running git");

    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| GitError::Spawn {
            args: args.join(" "),
            source: e,
        })?;

    if !output.status.success() {
        return Err(GitError::Failed {
            args: args.join(" "),
            status: output.status.to_string(),
            stderr: output.stderr.trim().to_str_lossy().into_owned(),
        });
    }

    Ok(output.stdout)
}

/// Lists added, modified, deleted and renamed files between two revisions.
///
/// Renames are detected at `similarity` percent or above.
///
/// # Errors
///
/// Returns [`GitError`] if `git diff-tree` fails.
pub fn diff_tree(
    repo: &Path,
    initial: &str,
    current: &str,
    similarity: u8,
) -> Result<Vec<u8>, GitError> {
    let args = diff_tree_args(initial, current, similarity);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    git_output(repo, &args)
}

/// Paths are emitted verbatim; with quoting on, git would escape non-ASCII
/// names into `"Formula/caf\303\251.rb"`.
fn diff_tree_args(initial: &str, current: &str, similarity: u8) -> Vec<String> {
    [
        "-c",
        "core.quotePath=false",
        "diff-tree",
        "-r",
        "--name-status",
        "--diff-filter=AMDR",
    ]
    .into_iter()
    .map(str::to_string)
    .chain([
        format!("-M{similarity}%"),
        initial.to_string(),
        current.to_string(),
    ])
    .collect()
}

/// Reads `file` as it was at `revision`.
///
/// Returns `Ok(None)` when the file did not exist at that revision.
///
/// # Errors
///
/// Returns [`GitError`] for any other git failure.
pub fn show_file(repo: &Path, revision: &str, file: &Path) -> Result<Option<Vec<u8>>, GitError> {
    let object = format!("{revision}:{}", file.display());
    match git_output(repo, &["show", &object]) {
        Ok(contents) => Ok(Some(contents)),
        Err(GitError::Failed { ref stderr, .. })
            if stderr.contains("does not exist") || stderr.contains("exists on disk, but not in") =>
        {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Abbreviates a revision, falling back to the revision itself.
pub fn short_revision(repo: &Path, revision: &str) -> String {
    match git_output(repo, &["rev-parse", "--short", revision]) {
        Ok(output) => {
            let short = output.trim().to_str_lossy().into_owned();
            if short.is_empty() {
                revision.to_string()
            } else {
                short
            }
        }
        Err(e) => {
            debug!(error = %e, revision, "Failed to shorten revision");
            revision.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_tree_disables_path_quoting() {
        let args = diff_tree_args("abc", "def", 85);
        assert_eq!(&args[..2], ["-c", "core.quotePath=false"]);
        assert_eq!(args[2], "diff-tree");
    }

    #[test]
    fn diff_tree_passes_similarity_and_revisions_last() {
        let args = diff_tree_args("abc", "def", 50);
        assert_eq!(&args[args.len() - 3..], ["-M50%", "abc", "def"]);
    }
}
