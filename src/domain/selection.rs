//! Tri-state selection: state, events, and the cascading engine.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::hierarchy::HierarchyIndex;

/// Checkbox state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    #[default]
    Unselected,
    Indeterminate,
    Selected,
}

impl SelectionState {
    /// State after a click: partial and empty selections both become full.
    pub fn clicked(self) -> Self {
        match self {
            SelectionState::Selected => SelectionState::Unselected,
            SelectionState::Unselected | SelectionState::Indeterminate => SelectionState::Selected,
        }
    }

    pub fn is_selected(self) -> bool {
        self == SelectionState::Selected
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionState::Unselected => "unselected",
            SelectionState::Indeterminate => "indeterminate",
            SelectionState::Selected => "selected",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SelectionState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selected" | "on" | "1" => Ok(SelectionState::Selected),
            "unselected" | "off" | "0" => Ok(SelectionState::Unselected),
            "indeterminate" | "partial" => Ok(SelectionState::Indeterminate),
            _ => Err(DomainError::InvalidState(s.to_string())),
        }
    }
}

/// Selection state per node id. An absent id is Unselected.
pub type SelectionStates<Id> = HashMap<Id, SelectionState>;

pub fn state_of<Id: Eq + Hash>(states: &SelectionStates<Id>, id: &Id) -> SelectionState {
    states.get(id).copied().unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent<Id> {
    NodeClicked(Id),
    NodeToggled(Id, SelectionState),
    ClearAll,
    SelectAll(Vec<Id>),
}

/// State delta produced by one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult<Id: Eq + Hash> {
    pub updated_nodes: HashMap<Id, SelectionState>,
    /// Leaves whose state is Selected once the delta is merged into the
    /// current map. For `SelectAll` this includes leaves selected earlier
    /// outside the given roots, not only the leaves of the marked subtrees.
    pub selected_leaf_nodes: HashSet<Id>,
    /// Ancestors recomputed from their children
    pub affected_parents: HashSet<Id>,
}

impl<Id: Eq + Hash + Clone> SelectionResult<Id> {
    pub fn empty() -> Self {
        Self {
            updated_nodes: HashMap::new(),
            selected_leaf_nodes: HashSet::new(),
            affected_parents: HashSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updated_nodes.is_empty()
    }

    /// Merges the delta into `states`. Unselected entries are removed
    /// because absence already means Unselected.
    pub fn apply_to(&self, states: &mut SelectionStates<Id>) {
        for (id, state) in &self.updated_nodes {
            if *state == SelectionState::Unselected {
                states.remove(id);
            } else {
                states.insert(id.clone(), *state);
            }
        }
    }
}

/// Turns selection events into state deltas: cascade down to descendants,
/// then recompute every ancestor from its direct children.
///
/// Never fails; events naming unknown ids produce an empty delta.
#[derive(Debug, Default, Clone, Copy)]
pub struct CascadingSelectionEngine;

impl CascadingSelectionEngine {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "debug", skip(self, current, index))]
    pub fn handle<T, Id>(
        &self,
        event: SelectionEvent<Id>,
        current: &SelectionStates<Id>,
        index: &HierarchyIndex<'_, T, Id>,
    ) -> SelectionResult<Id>
    where
        Id: Eq + Hash + Clone + Debug,
    {
        match event {
            SelectionEvent::NodeClicked(id) => {
                let next = state_of(current, &id).clicked();
                self.toggle(&id, next, current, index)
            }
            SelectionEvent::NodeToggled(id, state) => self.toggle(&id, state, current, index),
            SelectionEvent::ClearAll => self.clear_all(current, index),
            SelectionEvent::SelectAll(roots) => self.select_all(&roots, current, index),
        }
    }

    fn toggle<T, Id>(
        &self,
        id: &Id,
        new_state: SelectionState,
        current: &SelectionStates<Id>,
        index: &HierarchyIndex<'_, T, Id>,
    ) -> SelectionResult<Id>
    where
        Id: Eq + Hash + Clone + Debug,
    {
        if !index.contains(id) {
            debug!(?id, "toggle on unknown id ignored");
            return SelectionResult::empty();
        }

        let mut updated = HashMap::new();
        updated.insert(id.clone(), new_state);

        // Indeterminate is never pushed down
        if new_state != SelectionState::Indeterminate {
            for descendant in index.descendants(id) {
                updated.insert(descendant, new_state);
            }
        }

        let mut affected_parents = HashSet::new();
        for ancestor in index.ancestors(id) {
            let state = recompute_from_children(&ancestor, current, &updated, index);
            updated.insert(ancestor.clone(), state);
            affected_parents.insert(ancestor);
        }

        let selected_leaf_nodes = selected_leaves(current, &updated, index);
        SelectionResult {
            updated_nodes: updated,
            selected_leaf_nodes,
            affected_parents,
        }
    }

    fn clear_all<T, Id>(
        &self,
        current: &SelectionStates<Id>,
        index: &HierarchyIndex<'_, T, Id>,
    ) -> SelectionResult<Id>
    where
        Id: Eq + Hash + Clone + Debug,
    {
        let updated_nodes = index
            .ids()
            .iter()
            .chain(current.keys())
            .map(|id| (id.clone(), SelectionState::Unselected))
            .collect();
        SelectionResult {
            updated_nodes,
            selected_leaf_nodes: HashSet::new(),
            affected_parents: HashSet::new(),
        }
    }

    fn select_all<T, Id>(
        &self,
        roots: &[Id],
        current: &SelectionStates<Id>,
        index: &HierarchyIndex<'_, T, Id>,
    ) -> SelectionResult<Id>
    where
        Id: Eq + Hash + Clone + Debug,
    {
        let mut updated = HashMap::new();
        for root in roots.iter().filter(|root| index.contains(root)) {
            updated.insert(root.clone(), SelectionState::Selected);
            for descendant in index.descendants(root) {
                updated.insert(descendant, SelectionState::Selected);
            }
        }
        if updated.is_empty() {
            return SelectionResult::empty();
        }

        // everything below the roots is Selected, so no ancestor needs recomputing
        let selected_leaf_nodes = selected_leaves(current, &updated, index);
        SelectionResult {
            updated_nodes: updated,
            selected_leaf_nodes,
            affected_parents: HashSet::new(),
        }
    }
}

fn merged_state<Id: Eq + Hash>(
    id: &Id,
    current: &SelectionStates<Id>,
    updated: &HashMap<Id, SelectionState>,
) -> SelectionState {
    updated
        .get(id)
        .copied()
        .unwrap_or_else(|| state_of(current, id))
}

fn recompute_from_children<T, Id>(
    parent: &Id,
    current: &SelectionStates<Id>,
    updated: &HashMap<Id, SelectionState>,
    index: &HierarchyIndex<'_, T, Id>,
) -> SelectionState
where
    Id: Eq + Hash + Clone + Debug,
{
    let mut all_selected = true;
    let mut all_unselected = true;
    for child in index.children(parent) {
        match merged_state(child, current, updated) {
            SelectionState::Selected => all_unselected = false,
            SelectionState::Unselected => all_selected = false,
            SelectionState::Indeterminate => {
                all_selected = false;
                all_unselected = false;
            }
        }
    }
    if all_selected {
        SelectionState::Selected
    } else if all_unselected {
        SelectionState::Unselected
    } else {
        SelectionState::Indeterminate
    }
}

fn selected_leaves<T, Id>(
    current: &SelectionStates<Id>,
    updated: &HashMap<Id, SelectionState>,
    index: &HierarchyIndex<'_, T, Id>,
) -> HashSet<Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    index
        .leaves()
        .iter()
        .filter(|leaf| merged_state(*leaf, current, updated).is_selected())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SelectionState::Unselected, SelectionState::Selected)]
    #[case(SelectionState::Indeterminate, SelectionState::Selected)]
    #[case(SelectionState::Selected, SelectionState::Unselected)]
    fn test_click_cycle(#[case] before: SelectionState, #[case] after: SelectionState) {
        assert_eq!(before.clicked(), after);
    }

    #[rstest]
    #[case("selected", SelectionState::Selected)]
    #[case("OFF", SelectionState::Unselected)]
    #[case(" partial ", SelectionState::Indeterminate)]
    fn test_parse_state(#[case] input: &str, #[case] expected: SelectionState) {
        assert_eq!(input.parse::<SelectionState>().unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid_state() {
        assert!("maybe".parse::<SelectionState>().is_err());
    }

    #[test]
    fn test_apply_drops_unselected_entries() {
        let mut states: SelectionStates<u32> = HashMap::from([(1, SelectionState::Selected)]);
        let mut result = SelectionResult::empty();
        result.updated_nodes.insert(1, SelectionState::Unselected);
        result.updated_nodes.insert(2, SelectionState::Indeterminate);
        result.apply_to(&mut states);
        assert_eq!(states, HashMap::from([(2, SelectionState::Indeterminate)]));
    }
}
