//! Orchestrates a full update report run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::config::UpdateEnvironment;
use crate::context::{ReportOptions, UpdateContext};
use crate::diff::{DiffSource, GitDiffSource};
use crate::external::{
    BrewExecutor, CellarState, Executor, FormulaLoader, InstallState, StanzaFormulaLoader,
};
use crate::git::short_revision;
use crate::hub::ReporterHub;
use crate::report::Category;
use crate::reporter::Reporter;
use crate::summary::RunSummary;
use crate::tap::{discover_taps, Tap};
use crate::templates::TemplateRenderer;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

/// Runs update reports against a local installation.
pub struct Runner {
    config: RunnerConfig,
    diff: Box<dyn DiffSource>,
    loader: Box<dyn FormulaLoader>,
    state: Box<dyn InstallState>,
    executor: Box<dyn Executor>,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner backed by git, the Cellar and the `brew` executable.
    pub fn new(config: RunnerConfig) -> Self {
        let settings = config.settings();
        let taps_root = settings.taps_root();
        Self {
            diff: Box::new(GitDiffSource::new(settings.similarity)),
            loader: Box::new(StanzaFormulaLoader::new(&taps_root)),
            state: Box::new(CellarState::new(
                settings.cellar(),
                settings.caskroom(),
                &taps_root,
            )),
            executor: Box::new(BrewExecutor::new(settings.brew_file())),
            renderer: TemplateRenderer::new(),
            config,
        }
    }

    /// Replaces the diff source.
    pub fn with_diff_source(mut self, diff: impl DiffSource + 'static) -> Self {
        self.diff = Box::new(diff);
        self
    }

    /// Replaces the formula loader.
    pub fn with_loader(mut self, loader: impl FormulaLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Replaces the install state.
    pub fn with_install_state(mut self, state: impl InstallState + 'static) -> Self {
        self.state = Box::new(state);
        self
    }

    /// Replaces the executor.
    pub fn with_executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Reads the update environment and runs.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the main revisions are unset.
    pub fn run(&self, out: &mut dyn Write) -> Result<RunSummary, RunnerError> {
        let env = UpdateEnvironment::from_env()?;
        self.run_with_environment(&env, out)
    }

    /// Executes the full reporting and migration flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if taps can't be enumerated or `out` can't be
    /// written.
    pub fn run_with_environment(
        &self,
        env: &UpdateEnvironment,
        out: &mut dyn Write,
    ) -> Result<RunSummary, RunnerError> {
        let preinstall = self.config.preinstall();
        let quiet = self.config.quiet();
        let settings = self.config.settings();
        let options = ReportOptions {
            preinstall,
            force: self.config.force(),
            developer: self.config.developer() || env.developer,
        };
        let ctx = UpdateContext {
            diff: self.diff.as_ref(),
            loader: self.loader.as_ref(),
            state: self.state.as_ref(),
            executor: self.executor.as_ref(),
            renderer: &self.renderer,
            options,
        };

        let mut summary = RunSummary::new(preinstall);
        let mut header_shown = false;

        if env.revisions.changed() {
            let repository = settings.repository();
            write_header(out, preinstall, &mut header_shown)?;
            writeln!(
                out,
                "Updated Homebrew from {} to {}.",
                short_revision(&repository, env.revisions.initial()),
                short_revision(&repository, env.revisions.current()),
            )?;
            summary.repository_updated = true;
        }

        if env.update_failed {
            summary.failed = true;
        }

        if env.disable_load_formula {
            debug!("Formula loading disabled, skipping tap reports");
            return Ok(summary);
        }

        let mut hub = ReporterHub::new();
        for tap in discover_taps(&settings.taps_root())? {
            if !tap.is_git() {
                continue;
            }
            if preinstall && env.install_from_api && (tap.is_core() || tap.is_core_cask()) {
                continue;
            }

            let name = tap.name();
            let reporter = match Reporter::from_env(tap) {
                Ok(reporter) => reporter,
                Err(e) => {
                    if options.developer {
                        error!(tap = %name, error = %e, "Skipping tap without revisions");
                    } else {
                        debug!(tap = %name, error = %e, "Skipping tap without revisions");
                    }
                    continue;
                }
            };
            if !reporter.updated() {
                continue;
            }

            hub.add(reporter, &ctx);
            if self.config.verbose() {
                if let Some(report) = hub.reporters().last().and_then(Reporter::cached_report) {
                    for (category, names) in report.iter() {
                        info!(tap = %name, category = %category, count = names.len(), "Tap changes");
                    }
                }
            }
            summary.taps_updated.push(name);
        }

        if !summary.taps_updated.is_empty() {
            write_header(out, preinstall, &mut header_shown)?;
            let count = summary.taps_updated.len();
            writeln!(
                out,
                "Updated {count} {} ({}).",
                if count == 1 { "tap" } else { "taps" },
                to_sentence(&summary.taps_updated),
            )?;
        }

        if summary.updated() {
            if hub.is_empty() {
                if !quiet {
                    writeln!(out, "No changes to formulae.")?;
                }
            } else {
                if !quiet {
                    hub.dump(out, ctx.state, !preinstall, settings.columns)?;
                }
                for outcome in hub.migrate(&ctx) {
                    if let Some(notice) = outcome.notice() {
                        writeln!(out, "{notice}")?;
                    }
                    summary.record_outcome(&outcome);
                }
            }
            summary.report = hub.report().clone();
            if preinstall {
                writeln!(out)?;
            }
        } else if !preinstall && !env.update_failed && !quiet {
            writeln!(out, "Already up-to-date.")?;
        }

        if !env.missing_remote_ref_dirs.is_empty() {
            report_missing_remote_refs(&env.missing_remote_ref_dirs, &mut summary, out)?;
        }

        info!(
            taps = summary.taps_updated.len(),
            modified = summary.count(Category::Modified),
            deleted = summary.count(Category::Deleted),
            migrated = summary.migrations_performed,
            "Update report complete"
        );
        Ok(summary)
    }
}

/// Announces an auto-update once, before the first update line.
fn write_header(out: &mut dyn Write, preinstall: bool, shown: &mut bool) -> std::io::Result<()> {
    if preinstall && !*shown {
        writeln!(out, "==> Auto-updated Homebrew!")?;
    }
    *shown = true;
    Ok(())
}

fn report_missing_remote_refs(
    dirs: &[std::path::PathBuf],
    summary: &mut RunSummary,
    out: &mut dyn Write,
) -> Result<(), RunnerError> {
    let names: Vec<String> = dirs.iter().map(|dir| tap_label(dir)).collect();
    error!(taps = ?names, "Remote default branch missing");
    writeln!(
        out,
        "Error: Some taps failed to update!\n\
         The following taps can not read their remote branches:\n  {}\n\
         This is happening because the remote branch was renamed or deleted.\n\
         Reset taps to point to the correct remote branches by running `brew tap --repair`",
        names.join("\n  "),
    )?;
    summary.missing_remote_refs = names;
    summary.failed = true;
    Ok(())
}

fn tap_label(dir: &Path) -> String {
    Tap::from_path(dir).map_or_else(|| dir.display().to_string(), |tap| tap.name())
}

/// Joins items as "a", "a and b", or "a, b and c".
fn to_sentence(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}
