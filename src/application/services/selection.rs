//! Selection session: owns the state map of one caller and reports changes.

use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, instrument};

use crate::domain::{
    resolve_data, state_of, CascadingSelectionEngine, CompleteSelectionResult, HierarchyIndex,
    SelectionAggregator, SelectionEvent, SelectionResult, SelectionState, SelectionStates,
};

/// Receives the payloads of all selected leaves after each applied change.
pub type LeafSelectionCallback<T> = Box<dyn FnMut(&[&T])>;

/// Receives the complete selection (direct plus inferred ancestors) after
/// each applied change.
pub type CompleteSelectionCallback<T, Id> = Box<dyn FnMut(&CompleteSelectionResult<'_, T, Id>)>;

/// Single-owner selection state driven through the cascading engine.
///
/// The index is passed per call because it is rebuilt on every forest
/// refresh while the state map outlives those rebuilds. Ids that disappear
/// from a rebuilt index stay in the map until `retain_known` is called.
pub struct SelectionSession<T, Id> {
    engine: CascadingSelectionEngine,
    states: SelectionStates<Id>,
    aggregator: SelectionAggregator<Id>,
    on_selection_change: Option<LeafSelectionCallback<T>>,
    on_complete_selection_change: Option<CompleteSelectionCallback<T, Id>>,
}

impl<T, Id> Default for SelectionSession<T, Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Id> SelectionSession<T, Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            engine: CascadingSelectionEngine::new(),
            states: SelectionStates::new(),
            aggregator: SelectionAggregator::new(),
            on_selection_change: None,
            on_complete_selection_change: None,
        }
    }

    /// Starts from previously stored states; all of them count as direct.
    pub fn with_states(states: SelectionStates<Id>) -> Self {
        Self {
            states,
            ..Self::new()
        }
    }

    pub fn on_selection_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[&T]) + 'static,
    {
        self.on_selection_change = Some(Box::new(callback));
        self
    }

    pub fn on_complete_selection_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&CompleteSelectionResult<'_, T, Id>) + 'static,
    {
        self.on_complete_selection_change = Some(Box::new(callback));
        self
    }

    pub fn states(&self) -> &SelectionStates<Id> {
        &self.states
    }

    pub fn state_of(&self, id: &Id) -> SelectionState {
        state_of(&self.states, id)
    }

    /// Runs `event` through the engine, applies the delta and fires both
    /// callbacks. An empty delta (unknown id) changes nothing and fires nothing.
    #[instrument(level = "debug", skip(self, index))]
    pub fn dispatch(
        &mut self,
        event: SelectionEvent<Id>,
        index: &HierarchyIndex<'_, T, Id>,
    ) -> SelectionResult<Id> {
        let result = self.engine.handle(event, &self.states, index);
        if result.is_empty() {
            return result;
        }

        self.aggregator.record(&result, &self.states);
        result.apply_to(&mut self.states);
        debug!(
            updated = result.updated_nodes.len(),
            selected_leaves = result.selected_leaf_nodes.len(),
            "selection applied"
        );

        if let Some(callback) = self.on_selection_change.as_mut() {
            let leaves = resolve_data(&result.selected_leaf_nodes, index);
            callback(leaves.as_slice());
        }
        if let Some(callback) = self.on_complete_selection_change.as_mut() {
            let complete = self.aggregator.aggregate(&self.states, index);
            callback(&complete);
        }
        result
    }

    pub fn click(&mut self, id: Id, index: &HierarchyIndex<'_, T, Id>) -> SelectionResult<Id> {
        self.dispatch(SelectionEvent::NodeClicked(id), index)
    }

    pub fn toggle(
        &mut self,
        id: Id,
        state: SelectionState,
        index: &HierarchyIndex<'_, T, Id>,
    ) -> SelectionResult<Id> {
        self.dispatch(SelectionEvent::NodeToggled(id, state), index)
    }

    pub fn complete_selection<'a>(
        &self,
        index: &HierarchyIndex<'a, T, Id>,
    ) -> CompleteSelectionResult<'a, T, Id> {
        self.aggregator.aggregate(&self.states, index)
    }

    /// Drops states of ids the index no longer knows. Returns how many were dropped.
    pub fn retain_known(&mut self, index: &HierarchyIndex<'_, T, Id>) -> usize {
        let before = self.states.len();
        self.states.retain(|id, _| index.contains(id));
        self.aggregator.retain_known(index);
        before - self.states.len()
    }

    /// Forgets all state without firing callbacks.
    pub fn reset(&mut self) {
        self.states.clear();
        self.aggregator.reset();
    }
}
