//! Relocation notices rendered with Handlebars.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

use serde::Serialize;

/// Which relocation a notice describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A cask was replaced by a formula.
    CaskMovedToFormula,
    /// A formula was replaced by a cask.
    FormulaMovedToCask {
        /// Whether the cask was installed automatically.
        auto_installed: bool,
    },
}

/// A headed block of user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "==> {}", self.title)?;
        write!(f, "{}", self.body)
    }
}
