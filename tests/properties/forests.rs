//! Generators for random adjacency lists.

use proptest::prelude::*;
use proptest::sample::Index;

use treesel::domain::SelectionState;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    pub id: u32,
    pub parent: Option<u32>,
    pub children: Vec<Row>,
}

pub fn id_of(row: &Row) -> u32 {
    row.id
}

pub fn parent_of(row: &Row) -> Option<u32> {
    row.parent
}

/// Consistent records: every parent id refers to an earlier record, so the
/// list has neither orphans nor cycles. Shuffled to break source order.
pub fn consistent_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(prop::option::weighted(0.8, any::<Index>()), 1..40)
        .prop_map(|choices| {
            choices
                .into_iter()
                .enumerate()
                .map(|(i, choice)| Row {
                    id: i as u32,
                    parent: match (i, choice) {
                        (0, _) | (_, None) => None,
                        (i, Some(ix)) => Some(ix.index(i) as u32),
                    },
                    children: Vec::new(),
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

#[derive(Debug, Clone)]
pub enum Action {
    Click(Index),
    Toggle(Index, bool),
    ClearAll,
    SelectAllRoots,
}

/// Actions that keep parents consistent with their children.
pub fn actions() -> impl Strategy<Value = Vec<Action>> {
    let action = prop_oneof![
        4 => any::<Index>().prop_map(Action::Click),
        4 => (any::<Index>(), any::<bool>()).prop_map(|(ix, on)| Action::Toggle(ix, on)),
        1 => Just(Action::ClearAll),
        1 => Just(Action::SelectAllRoots),
    ];
    prop::collection::vec(action, 0..20)
}

pub fn on_off(on: bool) -> SelectionState {
    if on {
        SelectionState::Selected
    } else {
        SelectionState::Unselected
    }
}
