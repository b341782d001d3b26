#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod classify;
pub mod config;
pub mod context;
pub mod diff;
pub mod external;
pub mod git;
pub mod hub;
pub mod report;
pub mod reporter;
pub mod runner;
pub mod summary;
pub mod tap;
pub mod templates;

#[cfg(test)]
mod testing;

pub use classify::{ChangeEvent, Classifier};
pub use config::{ConfigError, RevisionPair, UpdateEnvironment, UpdateSettings};
pub use context::{ReportOptions, UpdateContext};
pub use diff::{parse_diff, DiffRecord, DiffSource, GitDiffSource, StatusCode};
pub use external::{
    BrewExecutor, CellarState, Executor, ExternalError, FormulaInfo, FormulaLoader, InstallState,
    PkgVersion, StanzaFormulaLoader,
};
pub use git::GitError;
pub use hub::{format_columns, ReporterHub, SummarySection};
pub use report::{Category, Report};
pub use reporter::{confirmed_renames, reconcile_renames, EntryError, Reporter};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{MigrationOutcome, RunSummary};
pub use tap::{discover_taps, MigrationTable, MigrationTarget, RenameTable, Tap, TapError};
pub use templates::{Notice, NoticeKind, TemplateError, TemplateRenderer};
