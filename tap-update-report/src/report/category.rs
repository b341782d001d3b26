//! Report categories.

use serde::Serialize;

/// Kind of change a report entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    /// Added formula. Only used while reconciling renames.
    #[serde(rename = "A")]
    Added,
    /// Deleted formula.
    #[serde(rename = "D")]
    Deleted,
    /// Modified formula.
    #[serde(rename = "M")]
    Modified,
    /// Modified cask.
    #[serde(rename = "MC")]
    CaskModified,
    /// Deleted cask.
    #[serde(rename = "DC")]
    CaskDeleted,
}

impl Category {
    /// Categories that survive reconciliation, in listing order.
    pub const PUBLIC: [Category; 4] = [
        Category::Modified,
        Category::Deleted,
        Category::CaskModified,
        Category::CaskDeleted,
    ];

    /// Returns the short code used as the serialized key.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Added => "A",
            Self::Deleted => "D",
            Self::Modified => "M",
            Self::CaskModified => "MC",
            Self::CaskDeleted => "DC",
        }
    }

    /// Returns the listing heading, or `None` for the transient added
    /// category, which never survives reconciliation.
    #[must_use]
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::Added => None,
            Self::Deleted => Some("Deleted Formulae"),
            Self::Modified => Some("Updated Formulae"),
            Self::CaskModified => Some("Updated Casks"),
            Self::CaskDeleted => Some("Deleted Casks"),
        }
    }

    /// Returns true for cask categories.
    #[must_use]
    pub fn is_cask(&self) -> bool {
        matches!(self, Self::CaskModified | Self::CaskDeleted)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
