//! Applies relocations to the local installation.
//!
//! Two independent passes run after reporting: one for packages that moved
//! to another tap and one for formulae renamed within a tap. Each entry is
//! handled on its own; a failure is logged and recorded, never propagated.

use super::error::{log_recovered, EntryError};
use super::Reporter;
use crate::context::UpdateContext;
use crate::report::Category;
use crate::summary::MigrationOutcome;
use crate::tap::{bare_name, MigrationTarget, ResolvedMigration};
use crate::templates::NoticeKind;
use tracing::{debug, info};

impl Reporter {
    /// Moves installed packages that were deleted here because they now live
    /// in another tap.
    pub fn migrate_tap_migration(&self, ctx: &UpdateContext<'_>) -> Vec<MigrationOutcome> {
        let report = self.report(ctx);
        let deleted = report
            .get(Category::Deleted)
            .iter()
            .chain(report.get(Category::CaskDeleted));

        let mut outcomes = Vec::new();
        for full_name in deleted {
            let name = bare_name(full_name);
            let Some(target) = self.tap().migrations().get(name) else {
                continue;
            };
            let resolved = target.resolve(name);

            let result = if report.contains(Category::CaskDeleted, full_name) {
                self.migrate_cask_to_formula(ctx, name, &resolved)
            } else {
                self.migrate_formula_to_new_tap(ctx, name, target, &resolved)
            };

            outcomes.push(result.unwrap_or_else(|e| {
                log_recovered(ctx.options.developer, name, &e);
                MigrationOutcome::Failed {
                    name: name.to_string(),
                    error: e.to_string(),
                }
            }));
        }
        outcomes
    }

    /// Moves installed kegs of renamed formulae to their new names.
    pub fn migrate_formula_rename(&self, ctx: &UpdateContext<'_>) -> Vec<MigrationOutcome> {
        let renames = self.tap().renames();
        let mut outcomes = Vec::new();

        // Only racks left behind by a rename in this tap are cleaned up.
        for (old_name, _) in renames.iter() {
            if ctx.state.needs_migration(old_name) && ctx.state.is_rack_empty(old_name) {
                if let Err(e) = ctx.state.remove_rack(old_name) {
                    debug!(formula = %old_name, error = %e, "Failed to remove empty rack");
                }
            }
        }

        for old_name in ctx.state.installed_formulae() {
            if !ctx.state.needs_migration(&old_name) {
                continue;
            }
            let Some(new_name) = renames.new_name(&old_name) else {
                continue;
            };

            let new_full_name = format!("{}/{new_name}", self.tap().name());
            let info = match ctx.loader.resolve(&new_full_name) {
                Ok(info) => info,
                Err(e) => {
                    log_recovered(ctx.options.developer, &new_full_name, &e.into());
                    continue;
                }
            };

            info!(from = %old_name, to = %info.full_name, "Migrating renamed formula");
            outcomes.push(match ctx.executor.migrate(&info.full_name, ctx.options.force) {
                Ok(()) => MigrationOutcome::Migrated {
                    name: old_name,
                    target: info.full_name,
                    notice: None,
                },
                Err(e) => {
                    let e = EntryError::from(e);
                    log_recovered(ctx.options.developer, &old_name, &e);
                    MigrationOutcome::Failed {
                        name: old_name,
                        error: e.to_string(),
                    }
                }
            });
        }
        outcomes
    }

    fn migrate_cask_to_formula(
        &self,
        ctx: &UpdateContext<'_>,
        name: &str,
        target: &ResolvedMigration,
    ) -> Result<MigrationOutcome, EntryError> {
        if !ctx.state.is_cask_installed(&target.new_name) {
            return Ok(MigrationOutcome::skipped(name, "cask not installed"));
        }

        if !ctx.state.is_tap_installed(&target.tap) {
            ctx.executor.tap(&target.tap)?;
        }

        let notice = ctx
            .renderer
            .render_notice(NoticeKind::CaskMovedToFormula, name, target)?;

        if ctx.state.is_installed(&target.new_name) {
            return Ok(MigrationOutcome::Skipped {
                name: name.to_string(),
                reason: "formula already installed".to_string(),
                notice: Some(notice),
            });
        }

        info!(cask = %name, formula = %target.new_full_name, "Installing replacement formula");
        ctx.executor.install(&target.new_full_name)?;

        // Linking is best effort.
        match ctx.loader.resolve(&target.new_full_name) {
            Ok(info) if info.keg_only => {}
            Ok(info) => {
                if let Err(e) = ctx.executor.link(&info.full_name, true) {
                    log_recovered(ctx.options.developer, &info.full_name, &e.into());
                }
            }
            Err(e) => log_recovered(ctx.options.developer, &target.new_full_name, &e.into()),
        }

        Ok(MigrationOutcome::Migrated {
            name: name.to_string(),
            target: target.new_full_name.clone(),
            notice: Some(notice),
        })
    }

    fn migrate_formula_to_new_tap(
        &self,
        ctx: &UpdateContext<'_>,
        name: &str,
        target: &MigrationTarget,
        resolved: &ResolvedMigration,
    ) -> Result<MigrationOutcome, EntryError> {
        if !ctx.state.is_installed(name) {
            return Ok(MigrationOutcome::skipped(name, "not installed"));
        }

        let installed_from = ctx.state.installed_tap(name);
        if !installed_from
            .as_deref()
            .is_some_and(|tap| tap.eq_ignore_ascii_case(&self.tap().name()))
        {
            return Ok(MigrationOutcome::skipped(name, "installed from another tap"));
        }

        if target.is_cask_tap() {
            if ctx.state.is_tap_installed(&resolved.tap) && ctx.state.has_caskroom() {
                info!(formula = %name, cask = %resolved.new_name, "Replacing formula with cask");
                ctx.executor.unlink(name)?;
                ctx.executor.cleanup()?;
                ctx.executor.install_cask(&resolved.new_name)?;
                let notice = ctx.renderer.render_notice(
                    NoticeKind::FormulaMovedToCask {
                        auto_installed: true,
                    },
                    name,
                    resolved,
                )?;
                return Ok(MigrationOutcome::Migrated {
                    name: name.to_string(),
                    target: resolved.new_name.clone(),
                    notice: Some(notice),
                });
            }

            let notice = ctx.renderer.render_notice(
                NoticeKind::FormulaMovedToCask {
                    auto_installed: false,
                },
                name,
                resolved,
            )?;
            return Ok(MigrationOutcome::Skipped {
                name: name.to_string(),
                reason: "cask tap not installed".to_string(),
                notice: Some(notice),
            });
        }

        if !ctx.state.is_tap_installed(&resolved.tap) {
            ctx.executor.tap(&resolved.tap)?;
        }
        let count = ctx.state.retarget_receipts(name, &resolved.tap)?;
        info!(formula = %name, tap = %resolved.tap, kegs = count, "Retargeted install receipts");

        Ok(MigrationOutcome::Migrated {
            name: name.to_string(),
            target: resolved.tap.clone(),
            notice: None,
        })
    }
}
