//! Parent/child index over an arbitrary forest.
//!
//! The index never owns payloads: `data` borrows into the forest it was built
//! from. It is rebuilt wholesale on every forest refresh, never patched.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, instrument, trace};

use crate::domain::cache::DisplayCache;
use crate::domain::forest::Forest;

/// Lookup structure answering parent, children, leaf, ancestor and
/// descendant queries by node id.
///
/// Duplicate ids are not supported: the last occurrence seen during the
/// depth-first build wins.
#[derive(Debug)]
pub struct HierarchyIndex<'a, T, Id> {
    parents: HashMap<Id, Id>,
    children: HashMap<Id, HashSet<Id>>,
    leaves: HashSet<Id>,
    data: HashMap<Id, &'a T>,
    roots: Vec<Id>,
    order: Vec<Id>,
    cache: DisplayCache<Id>,
}

impl<'a, T, Id> HierarchyIndex<'a, T, Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    fn empty() -> Self {
        Self {
            parents: HashMap::new(),
            children: HashMap::new(),
            leaves: HashSet::new(),
            data: HashMap::new(),
            roots: Vec::new(),
            order: Vec::new(),
            cache: DisplayCache::new(),
        }
    }

    /// Builds the index from a nested forest whose nodes expose their
    /// children through `children_of`.
    #[instrument(level = "debug", skip_all, fields(roots = forest.len()))]
    pub fn build<I, C>(forest: &'a [T], id_of: I, children_of: C) -> Self
    where
        I: Fn(&T) -> Id,
        C: Fn(&T) -> &[T],
    {
        let mut index = Self::empty();
        let mut stack: Vec<(&'a T, Option<Id>)> =
            forest.iter().rev().map(|node| (node, None)).collect();

        while let Some((node, parent)) = stack.pop() {
            let id = id_of(node);
            for child in children_of(node).iter().rev() {
                stack.push((child, Some(id.clone())));
            }
            index.record(id, node, parent);
        }

        index.finish()
    }

    /// Builds the index from an arena forest.
    #[instrument(level = "debug", skip_all, fields(nodes = forest.len()))]
    pub fn from_forest<I>(forest: &'a Forest<T>, id_of: I) -> Self
    where
        I: Fn(&T) -> Id,
    {
        let mut index = Self::empty();
        let mut ids = HashMap::with_capacity(forest.len());

        // pre-order: a parent's id is known before its children are visited
        for (idx, node) in forest.iter() {
            let id = id_of(&node.data);
            let parent = node.parent.and_then(|p| ids.get(&p).cloned());
            ids.insert(idx, id.clone());
            index.record(id, &node.data, parent);
        }

        index.finish()
    }

    fn record(&mut self, id: Id, data: &'a T, parent: Option<Id>) {
        trace!(?id, ?parent, "index node");
        match parent {
            Some(parent_id) => {
                self.leaves.remove(&parent_id);
                self.children
                    .entry(parent_id.clone())
                    .or_default()
                    .insert(id.clone());
                self.parents.insert(id.clone(), parent_id);
            }
            None => self.roots.push(id.clone()),
        }
        let own_children = self.children.entry(id.clone()).or_default();
        if own_children.is_empty() {
            self.leaves.insert(id.clone());
        }
        self.order.push(id.clone());
        self.data.insert(id, data);
    }

    fn finish(mut self) -> Self {
        let mut seen = HashSet::new();
        let parents = &self.parents;
        self.roots
            .retain(|id| !parents.contains_key(id) && seen.insert(id.clone()));
        let mut seen = HashSet::new();
        self.order.retain(|id| seen.insert(id.clone()));
        debug!(
            nodes = self.order.len(),
            roots = self.roots.len(),
            leaves = self.leaves.len(),
            "hierarchy index built"
        );
        self
    }

    pub fn parent(&self, id: &Id) -> Option<&Id> {
        self.parents.get(id)
    }

    /// Direct children of `id`; empty for leaves and unknown ids.
    pub fn children(&self, id: &Id) -> impl Iterator<Item = &Id> + '_ {
        self.children.get(id).into_iter().flatten()
    }

    pub fn child_count(&self, id: &Id) -> usize {
        self.children.get(id).map_or(0, HashSet::len)
    }

    /// True for nodes without children and for unknown ids.
    pub fn is_leaf(&self, id: &Id) -> bool {
        self.children.get(id).map_or(true, HashSet::is_empty)
    }

    /// Ancestors of `id`, immediate parent first.
    pub fn ancestors(&self, id: &Id) -> Vec<Id> {
        let mut ancestors = Vec::new();
        let mut visited = HashSet::from([id.clone()]);
        let mut current = self.parents.get(id);
        while let Some(parent) = current {
            if !visited.insert(parent.clone()) {
                break;
            }
            ancestors.push(parent.clone());
            current = self.parents.get(parent);
        }
        ancestors
    }

    /// Every node below `id`, excluding `id` itself. Unordered.
    pub fn descendants(&self, id: &Id) -> HashSet<Id> {
        let mut descendants = HashSet::new();
        let mut stack: Vec<&Id> = self.children(id).collect();
        while let Some(current) = stack.pop() {
            if current == id || !descendants.insert(current.clone()) {
                continue;
            }
            stack.extend(self.children(current));
        }
        descendants
    }

    pub fn data(&self, id: &Id) -> Option<&'a T> {
        self.data.get(id).copied()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.data.contains_key(id)
    }

    /// Roots in source order.
    pub fn roots(&self) -> &[Id] {
        &self.roots
    }

    /// All ids in depth-first pre-order of the source forest.
    pub fn ids(&self) -> &[Id] {
        &self.order
    }

    pub fn leaves(&self) -> &HashSet<Id> {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn cache(&self) -> &DisplayCache<Id> {
        &self.cache
    }

    /// Memoized label of `id`; None if the id does not resolve.
    pub fn cached_label<L>(&self, id: &Id, label_of: L) -> Option<String>
    where
        L: FnOnce(&T) -> String,
    {
        let data = self.data(id)?;
        Some(self.cache.label_or_insert_with(id, || label_of(data)))
    }

    /// Memoized icon of `id`; None if the id does not resolve or has no icon.
    pub fn cached_icon<F>(&self, id: &Id, icon_of: F) -> Option<String>
    where
        F: FnOnce(&T) -> Option<String>,
    {
        let data = self.data(id)?;
        self.cache.icon_or_insert_with(id, || icon_of(data))
    }
}
