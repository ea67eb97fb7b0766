//! Property tests for list/tree conversion and breadcrumbs.

use std::collections::HashSet;

use proptest::prelude::*;

use treesel::domain::{breadcrumb, list_to_tree, tree_to_list};

use crate::forests::{consistent_rows, id_of, parent_of, Row};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: flattening a converted forest gives back the same record set.
    #[test]
    fn property_round_trip(rows in consistent_rows()) {
        let expected: HashSet<Row> = rows.iter().cloned().collect();

        let flat = tree_to_list(list_to_tree(rows, id_of, parent_of));

        prop_assert_eq!(flat.len(), expected.len());
        prop_assert_eq!(flat.into_iter().collect::<HashSet<_>>(), expected);
    }

    /// PROPERTY: breadcrumbs start at a root, end at the target and link parent to child.
    #[test]
    fn property_breadcrumb_correct(rows in consistent_rows()) {
        for target in rows.iter().map(id_of) {
            let path = breadcrumb(&rows, &target, id_of, parent_of);

            prop_assert!(!path.is_empty());
            prop_assert_eq!(path[0].parent, None);
            prop_assert_eq!(path[path.len() - 1].id, target);
            for pair in path.windows(2) {
                prop_assert_eq!(pair[1].parent, Some(pair[0].id));
            }
        }
    }
}
