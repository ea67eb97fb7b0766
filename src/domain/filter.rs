//! Predicate filters that keep the ancestor chain of every match.
//!
//! Two rules are provided and deliberately kept apart:
//! - *ancestors*: a node survives iff it matches or one of its children
//!   survives. Non-matching children of a match are pruned as well.
//! - *lineage*: a matching node survives together with its whole subtree;
//!   a non-matching node survives iff one of its children survives.
//!
//! All filters mutate in place. Clone first if the original is still needed.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::forest::Forest;

/// Prunes `forest` so that only matches and their ancestors remain.
pub fn filter_preserve_ancestors<N, C, P>(forest: &mut Vec<N>, children_of: C, predicate: P)
where
    C: Fn(&mut N) -> &mut Vec<N>,
    P: Fn(&N) -> bool,
{
    for i in (0..forest.len()).rev() {
        if !retain_ancestors(&mut forest[i], &children_of, &predicate) {
            forest.remove(i);
        }
    }
}

// children are visited back to front so removal never shifts an unvisited index
fn retain_ancestors<N, C, P>(node: &mut N, children_of: &C, predicate: &P) -> bool
where
    C: Fn(&mut N) -> &mut Vec<N>,
    P: Fn(&N) -> bool,
{
    let matched = predicate(&*node);
    let children = children_of(node);
    let mut kept_child = false;
    for i in (0..children.len()).rev() {
        if retain_ancestors(&mut children[i], children_of, predicate) {
            kept_child = true;
        } else {
            children.remove(i);
        }
    }
    matched || kept_child
}

/// Prunes `forest` so that matches keep both their ancestors and their
/// complete subtrees.
pub fn filter_preserve_lineage<N, C, P>(forest: &mut Vec<N>, children_of: C, predicate: P)
where
    C: Fn(&mut N) -> &mut Vec<N>,
    P: Fn(&N) -> bool,
{
    for i in (0..forest.len()).rev() {
        if !retain_lineage(&mut forest[i], &children_of, &predicate) {
            forest.remove(i);
        }
    }
}

fn retain_lineage<N, C, P>(node: &mut N, children_of: &C, predicate: &P) -> bool
where
    C: Fn(&mut N) -> &mut Vec<N>,
    P: Fn(&N) -> bool,
{
    if predicate(&*node) {
        return true;
    }
    let children = children_of(node);
    let mut kept_child = false;
    for i in (0..children.len()).rev() {
        if retain_lineage(&mut children[i], children_of, predicate) {
            kept_child = true;
        } else {
            children.remove(i);
        }
    }
    kept_child
}

impl<T> Forest<T> {
    /// Arena version of `filter_preserve_ancestors`. Returns the number of
    /// nodes freed.
    #[instrument(level = "debug", skip_all)]
    pub fn retain_with_ancestors<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        let mut keep: HashSet<Index> = HashSet::new();
        for (idx, node) in self.iter_postorder() {
            if predicate(&node.data) || node.children.iter().any(|child| keep.contains(child)) {
                keep.insert(idx);
            }
        }
        let removed = self.retain_nodes(&keep);
        debug!(kept = keep.len(), removed, "filtered with ancestors");
        removed
    }

    /// Arena version of `filter_preserve_lineage`. Returns the number of
    /// nodes freed.
    #[instrument(level = "debug", skip_all)]
    pub fn retain_with_lineage<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        // nodes at or below a match
        let mut covered: HashSet<Index> = HashSet::new();
        for (idx, node) in self.iter() {
            let parent_covered = node.parent.is_some_and(|parent| covered.contains(&parent));
            if parent_covered || predicate(&node.data) {
                covered.insert(idx);
            }
        }

        let mut keep: HashSet<Index> = HashSet::new();
        for (idx, node) in self.iter_postorder() {
            if covered.contains(&idx) || node.children.iter().any(|child| keep.contains(child)) {
                keep.insert(idx);
            }
        }
        let removed = self.retain_nodes(&keep);
        debug!(kept = keep.len(), removed, "filtered with lineage");
        removed
    }
}
