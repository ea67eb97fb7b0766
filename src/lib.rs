//! Tree hierarchy indexing, tri-state cascading selection, list/tree
//! conversion and ancestor-preserving filters over caller-owned forests.
//!
//! Every operation is total: unknown ids produce empty results and
//! inconsistent records are dropped rather than reported. Strict
//! validation is opt-in through [`domain::validate_records`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

use std::fmt::Debug;
use std::hash::Hash;

pub use domain::{
    aggregate_selection, breadcrumb, filter_preserve_ancestors, filter_preserve_lineage,
    list_to_tree, tree_to_list, CascadingSelectionEngine, CompleteSelectionResult, Forest,
    HierarchyIndex, SelectionEvent, SelectionResult, SelectionState, SelectionStates,
};

/// Indexes a nested forest whose payloads own their children.
pub fn build_hierarchy<'a, T, Id, I, C>(forest: &'a [T], id_of: I, children_of: C) -> HierarchyIndex<'a, T, Id>
where
    Id: Eq + Hash + Clone + Debug,
    I: Fn(&T) -> Id,
    C: Fn(&T) -> &[T],
{
    HierarchyIndex::build(forest, id_of, children_of)
}

/// Runs one event against `current` and returns the delta; `current` is not
/// modified.
pub fn handle_selection_event<T, Id>(
    event: SelectionEvent<Id>,
    current: &SelectionStates<Id>,
    index: &HierarchyIndex<'_, T, Id>,
) -> SelectionResult<Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    CascadingSelectionEngine::new().handle(event, current, index)
}
