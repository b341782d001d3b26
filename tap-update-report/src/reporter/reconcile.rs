//! Collapses renames into a clean report.

use crate::report::{Category, Report};
use crate::tap::{bare_name, Tap};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Returns the `(old, new)` full-name pairs the report confirms as renames.
///
/// A pair is confirmed from either side: an added name whose old name was
/// deleted, or a deleted name whose new name was added. Both directions
/// require the counterpart to be present in the report.
pub fn confirmed_renames(tap: &Tap, report: &Report) -> BTreeSet<(String, String)> {
    let renames = tap.renames();
    let mut confirmed = BTreeSet::new();
    if renames.is_empty() {
        return confirmed;
    }

    for new_full_name in report.get(Category::Added) {
        let new_name = bare_name(new_full_name);
        let Some(old_name) = renames.old_name(new_name) else {
            continue;
        };
        let old_full_name = tap.qualify(old_name);
        if report.contains(Category::Deleted, &old_full_name) {
            confirmed.insert((old_full_name, new_full_name.clone()));
        }
    }

    for old_full_name in report.get(Category::Deleted) {
        let old_name = bare_name(old_full_name);
        let Some(new_name) = renames.new_name(old_name) else {
            continue;
        };
        let new_full_name = tap.qualify(new_name);
        if report.contains(Category::Added, &new_full_name) {
            confirmed.insert((old_full_name.clone(), new_full_name));
        }
    }

    confirmed
}

/// Removes confirmed renames from the added and deleted categories, then
/// drops the added category entirely.
pub fn reconcile_renames(tap: &Tap, report: &mut Report) {
    let confirmed = confirmed_renames(tap, report);

    if !confirmed.is_empty() {
        debug!(tap = %tap, count = confirmed.len(), "Absorbing confirmed renames");
        let old_names: HashSet<String> = confirmed.iter().map(|(old, _)| old.clone()).collect();
        let new_names: HashSet<String> = confirmed.into_iter().map(|(_, new)| new).collect();
        report.remove_names(Category::Deleted, &old_names);
        report.remove_names(Category::Added, &new_names);
    }

    report.remove_category(Category::Added);
}
