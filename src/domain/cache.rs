//! Memoized display lookups keyed by node id.
//!
//! A cache belongs to exactly one `HierarchyIndex` and is dropped with it,
//! so a rebuilt index always starts from an empty cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
pub struct DisplayCache<Id> {
    labels: RefCell<HashMap<Id, String>>,
    icons: RefCell<HashMap<Id, Option<String>>>,
}

impl<Id> Default for DisplayCache<Id> {
    fn default() -> Self {
        Self {
            labels: RefCell::new(HashMap::new()),
            icons: RefCell::new(HashMap::new()),
        }
    }
}

impl<Id: Eq + Hash + Clone> DisplayCache<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized label for `id`, computing it with `f` on first use.
    pub fn label_or_insert_with<F>(&self, id: &Id, f: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(label) = self.labels.borrow().get(id) {
            return label.clone();
        }
        let label = f();
        self.labels.borrow_mut().insert(id.clone(), label.clone());
        label
    }

    /// Returns the memoized icon for `id`; a computed `None` is cached too.
    pub fn icon_or_insert_with<F>(&self, id: &Id, f: F) -> Option<String>
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(icon) = self.icons.borrow().get(id) {
            return icon.clone();
        }
        let icon = f();
        self.icons.borrow_mut().insert(id.clone(), icon.clone());
        icon
    }

    pub fn cached_labels(&self) -> usize {
        self.labels.borrow().len()
    }

    pub fn cached_icons(&self) -> usize {
        self.icons.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.borrow().is_empty() && self.icons.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_label_computed_once() {
        let cache: DisplayCache<u32> = DisplayCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "Root".to_string()
        };
        assert_eq!(cache.label_or_insert_with(&1, compute), "Root");
        assert_eq!(cache.label_or_insert_with(&1, || unreachable!()), "Root");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.cached_labels(), 1);
    }

    #[test]
    fn test_missing_icon_is_cached() {
        let cache: DisplayCache<u32> = DisplayCache::new();
        assert_eq!(cache.icon_or_insert_with(&7, || None), None);
        assert_eq!(cache.icon_or_insert_with(&7, || Some("x".into())), None);
        assert_eq!(cache.cached_icons(), 1);
    }
}
