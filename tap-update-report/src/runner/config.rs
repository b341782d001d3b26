//! Runner configuration.

use crate::config::UpdateSettings;

/// Configuration for one update run.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Installation layout and tuning.
    settings: UpdateSettings,
    /// Fast auto-update mode.
    preinstall: bool,
    /// Migrate across mismatched taps or versions.
    force: bool,
    /// Suppress informational lines.
    quiet: bool,
    /// Log each tap's report as it is built.
    verbose: bool,
    /// Surface recovered failures as errors.
    developer: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(settings: UpdateSettings, preinstall: bool, force: bool, quiet: bool) -> Self {
        Self {
            settings,
            preinstall,
            force,
            quiet,
            verbose: false,
            developer: false,
        }
    }

    /// Enables per-tap report logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enables developer diagnostics.
    pub fn with_developer(mut self, developer: bool) -> Self {
        self.developer = developer;
        self
    }

    /// Returns the settings.
    pub fn settings(&self) -> &UpdateSettings {
        &self.settings
    }

    /// Returns whether preinstall mode is enabled.
    pub fn preinstall(&self) -> bool {
        self.preinstall
    }

    /// Returns whether forced migration is enabled.
    pub fn force(&self) -> bool {
        self.force
    }

    /// Returns whether quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Returns whether verbose mode is enabled.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns whether developer diagnostics are enabled.
    pub fn developer(&self) -> bool {
        self.developer
    }
}
