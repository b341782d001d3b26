//! Cross-tap aggregation of reports.

mod columns;

pub use columns::format_columns;

use crate::context::UpdateContext;
use crate::external::InstallState;
use crate::report::{Category, Report};
use crate::reporter::Reporter;
use crate::summary::MigrationOutcome;
use crate::tap::bare_name;
use std::io::{self, Write};

/// One listed category of the update summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub category: Category,
    /// Section heading.
    pub title: &'static str,
    /// Sorted names still present on disk.
    pub names: Vec<String>,
}

/// Collects reporters of updated taps and their merged report.
#[derive(Debug, Default)]
pub struct ReporterHub {
    reporters: Vec<Reporter>,
    merged: Report,
}

impl ReporterHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reporter and merges its report.
    ///
    /// Categories are concatenated: a name reported by two taps is listed
    /// twice.
    pub fn add(&mut self, reporter: Reporter, ctx: &UpdateContext<'_>) {
        let report = reporter.report(ctx).clone();
        self.merged.merge(report);
        self.reporters.push(reporter);
    }

    /// Returns the reporters in the order they were added.
    pub fn reporters(&self) -> &[Reporter] {
        &self.reporters
    }

    /// Returns the merged report.
    pub fn report(&self) -> &Report {
        &self.merged
    }

    /// Returns true if no category holds a name.
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Returns the merged names of `category`.
    pub fn select(&self, category: Category) -> &[String] {
        self.merged.get(category)
    }

    /// Lists the public categories restricted to what is still installed.
    ///
    /// Names are sorted; categories with nothing installed are omitted.
    pub fn summarize(&self, state: &dyn InstallState) -> Vec<SummarySection> {
        Category::PUBLIC
            .into_iter()
            .filter_map(|category| {
                let title = category.title()?;
                let mut names: Vec<String> = self
                    .select(category)
                    .iter()
                    .filter(|name| is_present(state, category, name))
                    .cloned()
                    .collect();
                if names.is_empty() {
                    return None;
                }
                names.sort();
                Some(SummarySection {
                    category,
                    title,
                    names,
                })
            })
            .collect()
    }

    /// Writes the update summary.
    ///
    /// Without `updated_formula_report`, updated formulae and casks are
    /// reported as counts instead of listings.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if writing to `out` fails.
    pub fn dump(
        &self,
        out: &mut dyn Write,
        state: &dyn InstallState,
        updated_formula_report: bool,
        columns: usize,
    ) -> io::Result<()> {
        let mut sections = self.summarize(state).into_iter().peekable();

        for category in Category::PUBLIC {
            let counted = matches!(category, Category::Modified | Category::CaskModified);
            if counted && !updated_formula_report {
                self.dump_count(out, category)?;
            }

            let Some(section) = sections.next_if(|section| section.category == category) else {
                continue;
            };
            if counted && !updated_formula_report {
                continue;
            }
            writeln!(out, "==> {}", section.title)?;
            write!(out, "{}", format_columns(&section.names, columns))?;
        }
        Ok(())
    }

    fn dump_count(&self, out: &mut dyn Write, category: Category) -> io::Result<()> {
        let count = self.select(category).len();
        let Some(title) = category.title().filter(|_| count > 0) else {
            return Ok(());
        };
        let noun = match (category.is_cask(), count) {
            (true, 1) => "cask",
            (true, _) => "casks",
            (false, 1) => "formula",
            (false, _) => "formulae",
        };
        writeln!(out, "==> {title}")?;
        writeln!(out, "Updated {count} {noun}.")
    }

    /// Runs every reporter's tap migrations, then every rename migration.
    pub fn migrate(&self, ctx: &UpdateContext<'_>) -> Vec<MigrationOutcome> {
        let mut outcomes = Vec::new();
        for reporter in &self.reporters {
            outcomes.extend(reporter.migrate_tap_migration(ctx));
        }
        for reporter in &self.reporters {
            outcomes.extend(reporter.migrate_formula_rename(ctx));
        }
        outcomes
    }
}

fn is_present(state: &dyn InstallState, category: Category, name: &str) -> bool {
    if category.is_cask() {
        state.is_cask_installed(bare_name(name))
    } else {
        state.is_installed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevisionPair;
    use crate::tap::Tap;
    use crate::testing::{FakeDiff, Fixture};
    use tempfile::TempDir;

    fn core_tap(dir: &TempDir) -> Tap {
        std::fs::create_dir_all(dir.path().join("Formula")).unwrap();
        std::fs::create_dir_all(dir.path().join("Casks")).unwrap();
        Tap::new("homebrew", "core", dir.path())
    }

    fn hub_for(fixture: &Fixture, dir: &TempDir) -> ReporterHub {
        let mut hub = ReporterHub::new();
        let reporter = Reporter::new(core_tap(dir), RevisionPair::new("a", "b").unwrap());
        hub.add(reporter, &fixture.ctx());
        hub
    }

    #[test]
    fn preinstall_dump_keeps_category_order() {
        let dir = TempDir::new().unwrap();
        let mut fixture = Fixture {
            diff: FakeDiff::new("M\tFormula/foo.rb\nD\tFormula/gone.rb\nM\tCasks/app.rb\n"),
            ..Default::default()
        };
        fixture.options.preinstall = true;
        fixture.state.formulae.insert("gone".to_string());
        let hub = hub_for(&fixture, &dir);

        let mut out = Vec::new();
        hub.dump(&mut out, &fixture.state, false, 80).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "==> Updated Formulae\nUpdated 1 formula.\n\
             ==> Deleted Formulae\ngone\n\
             ==> Updated Casks\nUpdated 1 cask.\n"
        );
    }

    #[test]
    fn full_dump_lists_installed_names() {
        let dir = TempDir::new().unwrap();
        let mut fixture = Fixture {
            diff: FakeDiff::new("M\tFormula/foo.rb\nM\tFormula/bar.rb\nD\tCasks/app.rb\n"),
            ..Default::default()
        };
        fixture.state.formulae.insert("foo".to_string());
        fixture.state.casks.insert("app".to_string());
        let hub = hub_for(&fixture, &dir);

        let mut out = Vec::new();
        hub.dump(&mut out, &fixture.state, true, 80).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "==> Updated Formulae\nfoo\n==> Deleted Casks\napp\n"
        );
    }

    #[test]
    fn transient_category_has_no_section() {
        assert_eq!(Category::Added.title(), None);
        assert!(Category::PUBLIC
            .iter()
            .all(|category| category.title().is_some()));
    }
}
