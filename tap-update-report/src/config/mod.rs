//! Settings and update environment.
//!
//! Settings describe the installation layout and come from an optional
//! `update-report.toml`. The update environment carries the revision pairs
//! and flags the updater exports before handing over to update-report.

mod environment;
mod error;
mod settings;

pub use environment::{RevisionPair, UpdateEnvironment};
pub use error::ConfigError;
pub use settings::{UpdateSettings, DEFAULT_COLUMNS, DEFAULT_SIMILARITY};
