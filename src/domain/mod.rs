//! Domain layer: forest, hierarchy index, selection and tree transforms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod cache;
pub mod convert;
pub mod entities;
pub mod error;
pub mod filter;
pub mod forest;
pub mod hierarchy;
pub mod selection;
pub mod validate;

pub use aggregate::{aggregate_selection, resolve_data, CompleteSelectionResult, SelectionAggregator};
pub use cache::DisplayCache;
pub use convert::{
    append_records, breadcrumb, breadcrumb_branch, list_to_nested, list_to_tree,
    list_to_tree_with_roots, nested_to_list, tree_to_list,
};
pub use entities::{Record, RecordFile};
pub use error::DomainError;
pub use filter::{filter_preserve_ancestors, filter_preserve_lineage};
pub use forest::{Forest, ForestNode};
pub use hierarchy::HierarchyIndex;
pub use selection::{
    state_of, CascadingSelectionEngine, SelectionEvent, SelectionResult, SelectionState,
    SelectionStates,
};
pub use validate::{find_duplicate_ids, find_orphans, validate_records};
