//! Conversion between flat adjacency-list records and trees, plus
//! breadcrumb path reconstruction.
//!
//! Records are linked through an arena, so inconsistent input (orphans,
//! self-parents, parent cycles) can never produce aliased or cyclic trees:
//! anything not reachable from a root is dropped.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::forest::Forest;

/// Builds a forest from flat records. A record is a root when it declares
/// no parent.
///
/// Roots and children keep source order. Records whose declared parent is
/// missing are dropped silently, together with anything below them.
pub fn list_to_tree<T, Id, I, P>(records: Vec<T>, id_of: I, parent_id_of: P) -> Forest<T>
where
    Id: Eq + Hash,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
{
    let is_root = |record: &T| parent_id_of(record).is_none();
    list_to_tree_with_roots(records, &id_of, &parent_id_of, is_root)
}

/// Like `list_to_tree`, with a caller-supplied root test. A record accepted
/// as root is never attached under a parent as well.
pub fn list_to_tree_with_roots<T, Id, I, P, R>(
    records: Vec<T>,
    id_of: I,
    parent_id_of: P,
    is_root: R,
) -> Forest<T>
where
    Id: Eq + Hash,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
    R: Fn(&T) -> bool,
{
    let mut forest = Forest::new();
    link_batch(&mut forest, records, &id_of, &parent_id_of, &is_root);
    forest
}

/// Appends a batch of records into an existing forest.
///
/// Parents are resolved against nodes already in the forest first, then
/// against the batch. Nothing is replaced: appending the same batch twice
/// attaches every child twice.
pub fn append_records<T, Id, I, P>(forest: &mut Forest<T>, records: Vec<T>, id_of: I, parent_id_of: P)
where
    Id: Eq + Hash,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
{
    let is_root = |record: &T| parent_id_of(record).is_none();
    link_batch(forest, records, &id_of, &parent_id_of, &is_root);
}

#[instrument(level = "debug", skip_all, fields(records = records.len()))]
fn link_batch<T, Id, I, P, R>(
    forest: &mut Forest<T>,
    records: Vec<T>,
    id_of: &I,
    parent_id_of: &P,
    is_root: &R,
) where
    Id: Eq + Hash,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
    R: Fn(&T) -> bool,
{
    let existing: HashMap<Id, Index> = forest
        .iter()
        .map(|(idx, node)| (id_of(&node.data), idx))
        .collect();

    let mut batch_ids: HashMap<Id, Index> = HashMap::with_capacity(records.len());
    let mut pending = Vec::with_capacity(records.len());
    for record in records {
        let id = id_of(&record);
        let parent = parent_id_of(&record);
        let root = is_root(&record);
        let idx = forest.insert_detached(record);
        batch_ids.insert(id, idx);
        pending.push((idx, parent, root));
    }

    for (idx, parent, root) in pending {
        if root {
            forest.push_root(idx);
            continue;
        }
        let parent_idx = parent.and_then(|p| existing.get(&p).or_else(|| batch_ids.get(&p)).copied());
        match parent_idx {
            Some(parent_idx) if parent_idx != idx => forest.attach(idx, parent_idx),
            _ => {}
        }
    }

    let dropped = forest.prune_unreachable();
    if dropped > 0 {
        debug!(dropped, "dropped records without a reachable parent");
    }
}

/// Builds nested trees for payloads that own their children.
///
/// Children are appended to whatever collection the payload already holds.
pub fn list_to_nested<N, Id, I, P, C>(records: Vec<N>, id_of: I, parent_id_of: P, children_of: C) -> Vec<N>
where
    Id: Eq + Hash,
    I: Fn(&N) -> Id,
    P: Fn(&N) -> Option<Id>,
    C: Fn(&mut N) -> &mut Vec<N>,
{
    list_to_tree(records, id_of, parent_id_of).into_nested(children_of)
}

/// Flattens a forest in pre-order, consuming it.
pub fn tree_to_list<T>(forest: Forest<T>) -> Vec<T> {
    forest.into_preorder()
}

/// Flattens nested trees in pre-order. Every node's children collection is
/// emptied on the way.
pub fn nested_to_list<N, C>(roots: Vec<N>, children_of: C) -> Vec<N>
where
    C: Fn(&mut N) -> &mut Vec<N>,
{
    let mut flat = Vec::new();
    let mut stack: Vec<N> = roots.into_iter().rev().collect();
    while let Some(mut node) = stack.pop() {
        let children = std::mem::take(children_of(&mut node));
        stack.extend(children.into_iter().rev());
        flat.push(node);
    }
    flat
}

/// Root-first chain of records ending at `target`.
///
/// Empty when `target` is absent. The walk stops at a parent id that
/// resolves to nothing, or at an id already on the path.
pub fn breadcrumb<'r, T, Id, I, P>(records: &'r [T], target: &Id, id_of: I, parent_id_of: P) -> Vec<&'r T>
where
    Id: Eq + Hash,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
{
    let by_id: HashMap<Id, &'r T> = records.iter().map(|record| (id_of(record), record)).collect();

    let mut path = VecDeque::new();
    let mut visited = HashSet::new();
    let mut current = by_id.get(target).copied();
    while let Some(record) = current {
        if !visited.insert(id_of(record)) {
            break;
        }
        path.push_front(record);
        current = parent_id_of(record).and_then(|parent| by_id.get(&parent).copied());
    }
    path.into()
}

/// Single-branch tree root → … → target, without siblings, for path
/// highlighting. Empty when `target` is absent.
pub fn breadcrumb_branch<T, Id, I, P>(records: &[T], target: &Id, id_of: I, parent_id_of: P) -> Forest<T>
where
    T: Clone,
    Id: Eq + Hash,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
{
    let mut forest = Forest::new();
    let mut parent = None;
    for record in breadcrumb(records, target, id_of, parent_id_of) {
        parent = Some(forest.insert_node(record.clone(), parent));
    }
    forest
}
