//! Categorized change reports.

mod category;

pub use category::Category;

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Category to ordered list of names.
///
/// Reading a category that was never written returns an empty slice and
/// leaves the report untouched. Entries keep insertion order, which is diff
/// order for a single tap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: BTreeMap<Category, Vec<String>>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the names recorded under `category`.
    pub fn get(&self, category: Category) -> &[String] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends `name` to `category`.
    pub fn push(&mut self, category: Category, name: impl Into<String>) {
        self.entries.entry(category).or_default().push(name.into());
    }

    /// Returns true if `name` is recorded under `category`.
    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.get(category).iter().any(|entry| entry == name)
    }

    /// Removes every occurrence of the given names from `category`.
    pub fn remove_names(&mut self, category: Category, names: &HashSet<String>) {
        if let Some(entries) = self.entries.get_mut(&category) {
            entries.retain(|entry| !names.contains(entry));
        }
    }

    /// Drops `category` entirely, returning what it held.
    pub fn remove_category(&mut self, category: Category) -> Option<Vec<String>> {
        self.entries.remove(&category)
    }

    /// Returns true if no category holds a name.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Iterates non-empty categories in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.entries
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(category, names)| (*category, names.as_slice()))
    }

    /// Appends every non-empty category of `other`.
    ///
    /// Colliding categories are concatenated, not unioned: the same name
    /// reported by two taps appears twice.
    pub fn merge(&mut self, other: Report) {
        for (category, names) in other.entries {
            if names.is_empty() {
                continue;
            }
            self.entries.entry(category).or_default().extend(names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_category_reads_empty() {
        let report = Report::new();

        assert!(report.get(Category::Deleted).is_empty());
        assert!(report.is_empty());
        assert_eq!(report, Report::new());
    }

    #[test]
    fn keeps_insertion_order() {
        let mut report = Report::new();
        report.push(Category::Modified, "zlib");
        report.push(Category::Modified, "abc");

        assert_eq!(report.get(Category::Modified), ["zlib", "abc"]);
    }

    #[test]
    fn empty_categories_do_not_count() {
        let mut report = Report::new();
        report.push(Category::Deleted, "foo");
        report.remove_names(
            Category::Deleted,
            &HashSet::from(["foo".to_string()]),
        );

        assert!(report.is_empty());
        assert_eq!(report.iter().count(), 0);
    }

    #[test]
    fn merge_concatenates() {
        let mut first = Report::new();
        first.push(Category::Modified, "x");
        let mut second = Report::new();
        second.push(Category::Modified, "x");
        second.push(Category::CaskDeleted, "y");

        first.merge(second);

        assert_eq!(first.get(Category::Modified), ["x", "x"]);
        assert_eq!(first.get(Category::CaskDeleted), ["y"]);
    }

    #[test]
    fn serializes_with_category_codes() {
        let mut report = Report::new();
        report.push(Category::CaskModified, "firefox");
        report.push(Category::Deleted, "old");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"D": ["old"], "MC": ["firefox"]})
        );
    }
}
