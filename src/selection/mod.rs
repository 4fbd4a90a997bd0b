//! Selection tracking over the currently visible result set.
//!
//! Mirrors the grid's two selection representations: an explicit set of
//! chosen ids, or — after "select all" — an implicit all-but-these set. A
//! single resolve function interprets both against a given result set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Selection over the current result set.
///
/// Include holds the ids that ARE selected; Exclude holds the ids that are
/// NOT selected (everything else in the result set is). Selected ids are
/// weak references: ids absent from the result set resolve to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "ids", rename_all = "camelCase")]
pub enum Selection {
    Include(BTreeSet<String>),
    Exclude(BTreeSet<String>),
}

/// The "selection changed" observable value: enough for a caller to enable
/// or disable bulk actions and label them with a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    pub count: usize,
    pub ids: Vec<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Include(BTreeSet::new())
    }
}

impl Selection {
    /// Empty include-mode selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every row in the current result set.
    pub fn select_all(&mut self) {
        *self = Selection::Exclude(BTreeSet::new());
    }

    /// Reset to no selection. Always normalizes to include-mode/empty so a
    /// later change in result-set size cannot resurrect a stale selection.
    pub fn clear(&mut self) {
        *self = Selection::Include(BTreeSet::new());
    }

    /// Flip one id. In include mode this adds/removes it from the selected
    /// set; in exclude mode it removes/adds it to the exclusion set.
    pub fn toggle(&mut self, id: &str) {
        let (Selection::Include(ids) | Selection::Exclude(ids)) = self;
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
    }

    /// Resolve to the concrete list of selected ids within `all_ids`, in
    /// result-set order.
    pub fn resolve(&self, all_ids: &[String]) -> Vec<String> {
        match self {
            Selection::Include(ids) => all_ids
                .iter()
                .filter(|id| ids.contains(*id))
                .cloned()
                .collect(),
            Selection::Exclude(ids) => all_ids
                .iter()
                .filter(|id| !ids.contains(*id))
                .cloned()
                .collect(),
        }
    }

    /// Number of selected rows given the result-set size.
    pub fn count(&self, total: usize) -> usize {
        match self {
            Selection::Include(ids) => ids.len(),
            Selection::Exclude(ids) => total.saturating_sub(ids.len()),
        }
    }

    /// True when nothing is selected; callers disable bulk actions on this.
    pub fn is_empty(&self, total: usize) -> bool {
        self.count(total) == 0
    }

    /// Snapshot count and resolved ids for observers.
    pub fn summary(&self, all_ids: &[String]) -> SelectionSummary {
        let ids = self.resolve(all_ids);
        SelectionSummary {
            count: ids.len(),
            ids,
        }
    }
}
