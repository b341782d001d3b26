//! Parsing of `--name-status` diff lines.

use bstr::ByteSlice;
use std::path::PathBuf;

/// Change status of one diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Added,
    Deleted,
    Modified,
    /// Renamed, with git's similarity score in percent.
    Renamed { similarity: u8 },
}

impl StatusCode {
    /// Parses a status column.
    ///
    /// Renames are `R` followed by up to three digits; a bare `R` counts as a
    /// full match. Any status other than `A`, `D`, `M` or a rename is `None`.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "A" => Some(Self::Added),
            "D" => Some(Self::Deleted),
            "M" => Some(Self::Modified),
            _ => {
                let digits = code.strip_prefix('R')?;
                if digits.is_empty() {
                    return Some(Self::Renamed { similarity: 100 });
                }
                if digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let score: u16 = digits.parse().ok()?;
                Some(Self::Renamed {
                    similarity: score.min(100) as u8,
                })
            }
        }
    }

    /// Returns true for renames.
    pub fn is_rename(&self) -> bool {
        matches!(self, Self::Renamed { .. })
    }
}

/// One changed file between two revisions.
///
/// For everything but renames `source_path == dest_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub status: StatusCode,
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
}

impl DiffRecord {
    /// Parses `status<TAB>path1[<TAB>path2]`.
    ///
    /// Columns are tab separated; lines without tabs are split on whitespace.
    /// Returns `None` for blank lines, lines without a path, and statuses the
    /// report doesn't act on.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let mut columns: Vec<&str> = if line.contains('\t') {
            line.split('\t').filter(|c| !c.is_empty()).collect()
        } else {
            line.split_whitespace().collect()
        };
        if columns.len() < 2 {
            return None;
        }

        let status = StatusCode::parse(columns.remove(0).trim())?;
        let source_path = PathBuf::from(columns[0]);
        let dest_path = PathBuf::from(columns[columns.len() - 1]);

        Some(Self {
            status,
            source_path,
            dest_path,
        })
    }
}

/// Parses raw `git diff-tree --name-status` output, dropping lines
/// [`DiffRecord::parse`] rejects.
pub fn parse_diff(output: &[u8]) -> Vec<DiffRecord> {
    output
        .lines()
        .filter_map(|line| DiffRecord::parse(&line.to_str_lossy()))
        .collect()
}
