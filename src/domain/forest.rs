//! Arena-backed forest: the native tree shape of the crate.
//!
//! Nodes live in a generational arena and reference each other by `Index`,
//! so parent/child links never alias live objects and a stale index simply
//! resolves to `None`.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Node in the arena-based forest.
#[derive(Debug, Clone)]
pub struct ForestNode<T> {
    /// Application payload
    pub data: T,
    /// Index of parent node in the arena, None for roots and detached nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

/// Ordered collection of trees sharing one arena.
///
/// Roots keep their insertion order, children keep theirs.
#[derive(Debug, Clone)]
pub struct Forest<T> {
    arena: Arena<ForestNode<T>>,
    roots: Vec<Index>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Forest<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Inserts a node under `parent`, or as a new root when `parent` is None.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: T, parent: Option<Index>) -> Index {
        let node_idx = self.insert_detached(data);
        match parent {
            Some(parent_idx) => self.attach(node_idx, parent_idx),
            None => self.roots.push(node_idx),
        }
        node_idx
    }

    /// Inserts a node that is neither a root nor attached to a parent.
    /// Unreachable until `attach` or `push_root` links it.
    pub(crate) fn insert_detached(&mut self, data: T) -> Index {
        self.arena.insert(ForestNode {
            data,
            parent: None,
            children: Vec::new(),
        })
    }

    pub(crate) fn attach(&mut self, child: Index, parent: Index) {
        if !self.arena.contains(child) {
            return;
        }
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(child);
        } else {
            return;
        }
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = Some(parent);
        }
    }

    pub(crate) fn push_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    pub fn get_node(&self, idx: Index) -> Option<&ForestNode<T>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ForestNode<T>> {
        self.arena.get_mut(idx)
    }

    /// Payload of the node at `idx`.
    pub fn get(&self, idx: Index) -> Option<&T> {
        self.arena.get(idx).map(|node| &node.data)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal over all trees, roots in order.
    pub fn iter(&self) -> ForestIterator<'_, T> {
        ForestIterator::new(self)
    }

    /// Post-order traversal over all trees: children before their parent.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest tree, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&root| (root, 1)).collect();

        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                max_depth = max_depth.max(depth);
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Collects all leaf nodes (nodes with no children) in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Root-first chain of indices ending at `idx`; empty if `idx` is gone.
    pub fn path_to(&self, idx: Index) -> Vec<Index> {
        let mut path = Vec::new();
        let mut current = self.arena.contains(idx).then_some(idx);
        while let Some(node_idx) = current {
            path.push(node_idx);
            current = self.get_node(node_idx).and_then(|node| node.parent);
        }
        path.reverse();
        path
    }

    /// Removes `idx` and its whole subtree, returning how many nodes were freed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> usize {
        let parent = match self.arena.get(idx) {
            Some(node) => node.parent,
            None => return 0,
        };
        match parent {
            Some(parent_idx) => {
                if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                    parent_node.children.retain(|&c| c != idx);
                }
            }
            None => self.roots.retain(|&r| r != idx),
        }

        let mut removed = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Frees every node that cannot be reached from a root.
    pub(crate) fn prune_unreachable(&mut self) -> usize {
        let reachable: HashSet<Index> = self.iter().map(|(idx, _)| idx).collect();
        self.retain_nodes(&reachable)
    }

    /// Keeps exactly the nodes in `keep`. The set must be closed under
    /// "parent of a kept node is kept", otherwise kept subtrees become unreachable.
    pub(crate) fn retain_nodes(&mut self, keep: &HashSet<Index>) -> usize {
        let doomed: Vec<Index> = self
            .arena
            .iter()
            .map(|(idx, _)| idx)
            .filter(|idx| !keep.contains(idx))
            .collect();
        for idx in &doomed {
            self.arena.remove(*idx);
        }
        self.roots.retain(|root| keep.contains(root));
        for (_, node) in self.arena.iter_mut() {
            node.children.retain(|child| keep.contains(child));
        }
        doomed.len()
    }

    /// Consumes the forest and returns payloads in pre-order.
    pub fn into_preorder(mut self) -> Vec<T> {
        let order: Vec<Index> = self.iter().map(|(idx, _)| idx).collect();
        order
            .into_iter()
            .filter_map(|idx| self.arena.remove(idx))
            .map(|node| node.data)
            .collect()
    }

    /// Consumes the forest and moves every node into its parent's own
    /// children collection, returning the roots.
    ///
    /// Children are appended after whatever the payload already holds.
    pub fn into_nested<C>(mut self, children_of: C) -> Vec<T>
    where
        C: Fn(&mut T) -> &mut Vec<T>,
    {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        let mut built: HashMap<Index, T> = HashMap::with_capacity(order.len());

        for idx in order {
            if let Some(node) = self.arena.remove(idx) {
                let mut data = node.data;
                let target = children_of(&mut data);
                for child in node.children {
                    if let Some(child_data) = built.remove(&child) {
                        target.push(child_data);
                    }
                }
                built.insert(idx, data);
            }
        }

        self.roots
            .iter()
            .filter_map(|root| built.remove(root))
            .collect()
    }
}

pub struct ForestIterator<'a, T> {
    forest: &'a Forest<T>,
    stack: Vec<Index>,
}

impl<'a, T> ForestIterator<'a, T> {
    fn new(forest: &'a Forest<T>) -> Self {
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a, T> Iterator for ForestIterator<'a, T> {
    type Item = (Index, &'a ForestNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    forest: &'a Forest<T>,
    stack: Vec<(Index, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(forest: &'a Forest<T>) -> Self {
        let stack = forest.roots.iter().rev().map(|&root| (root, false)).collect();
        Self { forest, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (Index, &'a ForestNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
