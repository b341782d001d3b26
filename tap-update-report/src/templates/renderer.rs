//! Notice renderer.

use crate::templates::{Notice, NoticeKind, TemplateError};
use crate::tap::ResolvedMigration;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

const CASK_MOVED_TITLE: &str = "{{name}} has been moved to Homebrew.";
const CASK_MOVED_BODY: &str = "To uninstall the cask, run:
  brew uninstall --cask --force {{name}}";

const FORMULA_MOVED_TITLE: &str = "{{name}} has been moved to Homebrew Cask.";
const FORMULA_MOVED_BODY: &str = "{{#if auto_installed}}The existing keg has been unlinked.
Please uninstall the formula when convenient by running:
  brew uninstall --force {{name}}{{else}}To uninstall the formula and install the cask, run:
  brew uninstall --force {{name}}
  brew tap {{new_tap}}
  brew install --cask {{new_name}}{{/if}}";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (notices are plain terminal text)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders relocation notices.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the notice for a package that moved to `target`.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which relocation happened
    /// * `name` - Bare name of the package before the move
    /// * `target` - Where it moved to
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_notice(
        &self,
        kind: NoticeKind,
        name: &str,
        target: &ResolvedMigration,
    ) -> Result<Notice, TemplateError> {
        let (title, body, auto_installed) = match kind {
            NoticeKind::CaskMovedToFormula => (CASK_MOVED_TITLE, CASK_MOVED_BODY, false),
            NoticeKind::FormulaMovedToCask { auto_installed } => {
                (FORMULA_MOVED_TITLE, FORMULA_MOVED_BODY, auto_installed)
            }
        };
        let data = json!({
            "name": name,
            "new_name": target.new_name,
            "new_tap": target.tap,
            "new_full_name": target.new_full_name,
            "auto_installed": auto_installed,
        });

        Ok(Notice {
            title: self.render_template(title, &data)?,
            body: self.render_template(body, &data)?,
        })
    }

    fn render_template(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tap::MigrationTarget;

    fn cask_target() -> ResolvedMigration {
        MigrationTarget::parse("foo", "homebrew/cask/foo-app")
            .unwrap()
            .resolve("foo")
    }

    #[test]
    fn renders_cask_moved_notice() {
        let renderer = TemplateRenderer::new();
        let target = MigrationTarget::parse("foo", "homebrew/core")
            .unwrap()
            .resolve("foo");

        let notice = renderer
            .render_notice(NoticeKind::CaskMovedToFormula, "foo", &target)
            .unwrap();

        assert_eq!(notice.title, "foo has been moved to Homebrew.");
        assert_eq!(
            notice.body,
            "To uninstall the cask, run:\n  brew uninstall --cask --force foo"
        );
    }

    #[test]
    fn renders_manual_cask_instructions() {
        let renderer = TemplateRenderer::new();

        let notice = renderer
            .render_notice(
                NoticeKind::FormulaMovedToCask {
                    auto_installed: false,
                },
                "foo",
                &cask_target(),
            )
            .unwrap();

        assert_eq!(notice.title, "foo has been moved to Homebrew Cask.");
        assert!(notice.body.contains("brew tap homebrew/cask"));
        assert!(notice.body.contains("brew install --cask foo-app"));
    }

    #[test]
    fn renders_auto_installed_cask_notice() {
        let renderer = TemplateRenderer::new();

        let notice = renderer
            .render_notice(
                NoticeKind::FormulaMovedToCask {
                    auto_installed: true,
                },
                "foo",
                &cask_target(),
            )
            .unwrap();

        assert!(notice.body.starts_with("The existing keg has been unlinked."));
        assert!(!notice.body.contains("brew tap"));
    }

    #[test]
    fn test_no_html_escaping() {
        let renderer = TemplateRenderer::new();
        let target = cask_target();

        let notice = renderer
            .render_notice(NoticeKind::CaskMovedToFormula, "a<b>&c", &target)
            .unwrap();

        assert!(notice.title.starts_with("a<b>&c"));
    }
}
