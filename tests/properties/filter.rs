//! Property tests for ancestor-preserving filters.

use std::collections::HashSet;

use proptest::prelude::*;

use treesel::domain::{
    breadcrumb, filter_preserve_ancestors, filter_preserve_lineage, list_to_nested, list_to_tree,
};

use crate::forests::{consistent_rows, id_of, parent_of, Row};

fn surviving_ids(nodes: &[Row], out: &mut HashSet<u32>) {
    for node in nodes {
        out.insert(node.id);
        surviving_ids(&node.children, out);
    }
}

/// Every matched id together with its original ancestors.
fn required_ids(rows: &[Row], matched: &HashSet<u32>) -> HashSet<u32> {
    matched
        .iter()
        .flat_map(|id| breadcrumb(rows, id, id_of, parent_of))
        .map(|row| row.id)
        .collect()
}

fn matches_strategy() -> impl Strategy<Value = HashSet<u32>> {
    prop::collection::hash_set(0u32..40, 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the ancestor filter keeps exactly the matches and their ancestors.
    #[test]
    fn property_filter_never_disconnects_match(rows in consistent_rows(), wanted in matches_strategy()) {
        let known: HashSet<u32> = rows.iter().map(id_of).collect();
        let matched: HashSet<u32> = wanted.intersection(&known).copied().collect();
        let required = required_ids(&rows, &matched);

        let mut nested = list_to_nested(rows.clone(), id_of, parent_of, |r| &mut r.children);
        filter_preserve_ancestors(&mut nested, |r| &mut r.children, |r| matched.contains(&r.id));
        let mut kept = HashSet::new();
        surviving_ids(&nested, &mut kept);

        prop_assert_eq!(&kept, &required);

        let mut arena = list_to_tree(rows, id_of, parent_of);
        arena.retain_with_ancestors(|r| matched.contains(&r.id));
        let arena_kept: HashSet<u32> = arena.iter().map(|(_, n)| n.data.id).collect();
        prop_assert_eq!(arena_kept, required);
    }

    /// PROPERTY: the lineage filter keeps a superset of the ancestor filter.
    #[test]
    fn property_lineage_keeps_superset(rows in consistent_rows(), wanted in matches_strategy()) {
        let mut by_ancestors = list_to_nested(rows.clone(), id_of, parent_of, |r| &mut r.children);
        let mut by_lineage = by_ancestors.clone();

        filter_preserve_ancestors(&mut by_ancestors, |r| &mut r.children, |r| wanted.contains(&r.id));
        filter_preserve_lineage(&mut by_lineage, |r| &mut r.children, |r| wanted.contains(&r.id));

        let mut narrow = HashSet::new();
        surviving_ids(&by_ancestors, &mut narrow);
        let mut wide = HashSet::new();
        surviving_ids(&by_lineage, &mut wide);
        prop_assert!(narrow.is_subset(&wide));
    }
}
