//! Property tests for cascading selection.

use proptest::prelude::*;

use treesel::domain::{
    list_to_tree, state_of, CascadingSelectionEngine, HierarchyIndex, SelectionEvent,
    SelectionState, SelectionStates,
};

use crate::forests::{actions, consistent_rows, id_of, on_off, parent_of, Action};

fn run(
    states: &mut SelectionStates<u32>,
    event: SelectionEvent<u32>,
    index: &HierarchyIndex<'_, crate::forests::Row, u32>,
) {
    CascadingSelectionEngine::new()
        .handle(event, states, index)
        .apply_to(states);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: selecting a node selects every descendant.
    #[test]
    fn property_cascade_down(rows in consistent_rows(), pick in any::<prop::sample::Index>()) {
        let forest = list_to_tree(rows, id_of, parent_of);
        let index = HierarchyIndex::from_forest(&forest, id_of);
        let target = index.ids()[pick.index(index.len())];
        let mut states = SelectionStates::new();

        run(&mut states, SelectionEvent::NodeToggled(target, SelectionState::Selected), &index);

        prop_assert_eq!(state_of(&states, &target), SelectionState::Selected);
        for descendant in index.descendants(&target) {
            prop_assert_eq!(state_of(&states, &descendant), SelectionState::Selected);
        }
    }

    /// PROPERTY: every parent summarizes its direct children after any action sequence.
    #[test]
    fn property_cascade_up_consistency(rows in consistent_rows(), actions in actions()) {
        let forest = list_to_tree(rows, id_of, parent_of);
        let index = HierarchyIndex::from_forest(&forest, id_of);
        let mut states = SelectionStates::new();

        for action in actions {
            let event = match action {
                Action::Click(ix) => SelectionEvent::NodeClicked(index.ids()[ix.index(index.len())]),
                Action::Toggle(ix, on) => {
                    SelectionEvent::NodeToggled(index.ids()[ix.index(index.len())], on_off(on))
                }
                Action::ClearAll => SelectionEvent::ClearAll,
                Action::SelectAllRoots => SelectionEvent::SelectAll(index.roots().to_vec()),
            };
            run(&mut states, event, &index);
        }

        for id in index.ids().iter().filter(|id| !index.is_leaf(id)) {
            let children: Vec<SelectionState> =
                index.children(id).map(|child| state_of(&states, child)).collect();
            let expected = if children.iter().all(|s| *s == SelectionState::Selected) {
                SelectionState::Selected
            } else if children.iter().all(|s| *s == SelectionState::Unselected) {
                SelectionState::Unselected
            } else {
                SelectionState::Indeterminate
            };
            prop_assert_eq!(state_of(&states, id), expected, "node {}", id);
        }
    }

    /// PROPERTY: ClearAll is idempotent, whatever the prior states hold.
    #[test]
    fn property_clear_all_idempotent(
        rows in consistent_rows(),
        prior in prop::collection::hash_map(0u32..60, prop_oneof![
            Just(SelectionState::Selected),
            Just(SelectionState::Indeterminate),
            Just(SelectionState::Unselected),
        ], 0..30),
    ) {
        let forest = list_to_tree(rows, id_of, parent_of);
        let index = HierarchyIndex::from_forest(&forest, id_of);
        let mut states: SelectionStates<u32> = prior;

        run(&mut states, SelectionEvent::ClearAll, &index);
        let once = states.clone();
        run(&mut states, SelectionEvent::ClearAll, &index);

        prop_assert!(once.is_empty());
        prop_assert_eq!(states, once);
    }
}
