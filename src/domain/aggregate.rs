//! Derives direct, indirect and complete selections from applied deltas.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::domain::hierarchy::HierarchyIndex;
use crate::domain::selection::{state_of, SelectionResult, SelectionState, SelectionStates};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provenance {
    /// Targeted by an event or reached by its downward cascade
    Direct,
    /// Became Selected through ancestor recomputation
    Indirect,
}

#[derive(Debug, Clone)]
pub struct CompleteSelectionResult<'a, T, Id> {
    pub direct_selected_nodes: HashSet<Id>,
    pub indirect_selected_nodes: HashSet<Id>,
    pub complete_selected_nodes: HashSet<Id>,
    /// Payloads of `complete_selected_nodes`, in forest pre-order
    pub selected_node_data: Vec<&'a T>,
}

/// Remembers why each node became Selected.
///
/// Only ids whose current state is Selected are ever reported, so provenance
/// of nodes deselected by later events never leaks into a result.
#[derive(Debug, Clone)]
pub struct SelectionAggregator<Id> {
    provenance: HashMap<Id, Provenance>,
}

impl<Id> Default for SelectionAggregator<Id> {
    fn default() -> Self {
        Self {
            provenance: HashMap::new(),
        }
    }
}

impl<Id> SelectionAggregator<Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Records provenance from a delta about to be applied to `previous`.
    ///
    /// A recomputed ancestor that was already Selected keeps the provenance
    /// it had; only a fresh transition to Selected counts as indirect.
    pub fn record(&mut self, result: &SelectionResult<Id>, previous: &SelectionStates<Id>) {
        for (id, state) in &result.updated_nodes {
            if *state != SelectionState::Selected {
                self.provenance.remove(id);
                continue;
            }
            if !result.affected_parents.contains(id) {
                self.provenance.insert(id.clone(), Provenance::Direct);
            } else if !state_of(previous, id).is_selected() {
                self.provenance.insert(id.clone(), Provenance::Indirect);
            }
        }
    }

    pub fn reset(&mut self) {
        self.provenance.clear();
    }

    /// Forgets ids the index no longer knows.
    pub fn retain_known<T>(&mut self, index: &HierarchyIndex<'_, T, Id>) {
        self.provenance.retain(|id, _| index.contains(id));
    }

    /// Selected nodes without recorded provenance (for example states seeded
    /// by the caller) count as direct.
    pub fn aggregate<'a, T>(
        &self,
        states: &SelectionStates<Id>,
        index: &HierarchyIndex<'a, T, Id>,
    ) -> CompleteSelectionResult<'a, T, Id> {
        let mut direct = HashSet::new();
        let mut indirect = HashSet::new();

        for (id, state) in states {
            if !state.is_selected() {
                continue;
            }
            match self.provenance.get(id) {
                Some(Provenance::Indirect) if !index.is_leaf(id) => {
                    indirect.insert(id.clone());
                }
                _ => {
                    direct.insert(id.clone());
                }
            }
        }

        let complete: HashSet<Id> = direct.union(&indirect).cloned().collect();
        let selected_node_data = resolve_data(&complete, index);
        CompleteSelectionResult {
            direct_selected_nodes: direct,
            indirect_selected_nodes: indirect,
            complete_selected_nodes: complete,
            selected_node_data,
        }
    }
}

/// Resolves ids to payloads in forest pre-order, skipping unresolved ids.
pub fn resolve_data<'a, T, Id>(ids: &HashSet<Id>, index: &HierarchyIndex<'a, T, Id>) -> Vec<&'a T>
where
    Id: Eq + Hash + Clone + Debug,
{
    index
        .ids()
        .iter()
        .filter(|id| ids.contains(*id))
        .filter_map(|id| index.data(id))
        .collect()
}

/// Aggregates a bare state map with no event history.
///
/// Provenance is inferred: a Selected parent whose children are all Selected
/// is what upward recomputation produces, so it counts as indirect. Every
/// other Selected id counts as direct.
pub fn aggregate_selection<'a, T, Id>(
    states: &SelectionStates<Id>,
    index: &HierarchyIndex<'a, T, Id>,
) -> CompleteSelectionResult<'a, T, Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    let mut aggregator = SelectionAggregator::new();
    for (id, state) in states {
        let inferred = state.is_selected()
            && !index.is_leaf(id)
            && index.children(id).all(|child| state_of(states, child).is_selected());
        if inferred {
            aggregator.provenance.insert(id.clone(), Provenance::Indirect);
        }
    }
    aggregator.aggregate(states, index)
}
