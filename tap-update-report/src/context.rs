//! Collaborators and switches shared by every reporter in a run.

use crate::diff::DiffSource;
use crate::external::{Executor, FormulaLoader, InstallState};
use crate::templates::TemplateRenderer;

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Fast auto-update mode: skip version comparison of modified formulae.
    pub preinstall: bool,
    /// Migrate renamed formulae even across mismatched taps or versions.
    pub force: bool,
    /// Log recovered failures with full detail.
    pub developer: bool,
}

/// Everything a reporter reaches outside the report core.
#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    pub diff: &'a dyn DiffSource,
    pub loader: &'a dyn FormulaLoader,
    pub state: &'a dyn InstallState,
    pub executor: &'a dyn Executor,
    pub renderer: &'a TemplateRenderer,
    pub options: ReportOptions,
}
