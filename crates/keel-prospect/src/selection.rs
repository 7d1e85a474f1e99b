//! Row selection for import.

use crate::result::{NormalizedResult, ResultId};
use serde::Serialize;
use std::collections::BTreeSet;

/// Identifiers of the rows chosen for import.
///
/// Keyed by result identifier so a row stays selected when pages are
/// appended. A new search starts from an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    ids: BTreeSet<ResultId>,
}

impl SelectionSet {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns whether it is now selected.
    pub fn toggle(&mut self, id: &ResultId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Select a single row.
    pub fn select(&mut self, id: &ResultId) {
        self.ids.insert(id.clone());
    }

    /// Select every loaded row.
    pub fn select_all(&mut self, loaded: &[NormalizedResult]) {
        self.ids.extend(loaded.iter().map(|r| r.id().clone()));
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &ResultId) -> bool {
        self.ids.contains(id)
    }

    /// Whether every loaded row is selected. False for an empty list.
    #[must_use]
    pub fn is_all_selected(&self, loaded: &[NormalizedResult]) -> bool {
        !loaded.is_empty() && loaded.iter().all(|r| self.ids.contains(r.id()))
    }

    /// Header checkbox: deselect all when everything is selected, else
    /// select all.
    pub fn toggle_all(&mut self, loaded: &[NormalizedResult]) {
        if self.is_all_selected(loaded) {
            self.deselect_all();
        } else {
            self.select_all(loaded);
        }
    }

    /// Drop identifiers that are not among the loaded rows.
    pub fn retain_loaded(&mut self, loaded: &[NormalizedResult]) {
        let loaded: BTreeSet<&ResultId> = loaded.iter().map(NormalizedResult::id).collect();
        self.ids.retain(|id| loaded.contains(id));
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Nothing selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected identifiers in the order the rows were loaded.
    #[must_use]
    pub fn selected_in(&self, loaded: &[NormalizedResult]) -> Vec<ResultId> {
        loaded
            .iter()
            .map(NormalizedResult::id)
            .filter(|id| self.ids.contains(*id))
            .cloned()
            .collect()
    }

    /// Iterate over selected identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &ResultId> {
        self.ids.iter()
    }
}
