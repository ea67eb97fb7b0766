//! Domain-level errors (no external dependencies)
//!
//! The tree operations themselves are total; these errors only come from
//! strict validation and from parsing user-supplied names.

use thiserror::Error;

use crate::domain::validate::join_ids;

/// Domain errors represent violated input expectations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("orphan records, declared parent missing: {}", join_ids(.0))]
    OrphanRecords(Vec<String>),

    #[error("duplicate ids: {}", join_ids(.0))]
    DuplicateIds(Vec<String>),

    #[error("unknown node id: {0}")]
    UnknownId(String),

    #[error("invalid selection state: {0} (expected selected, unselected or indeterminate)")]
    InvalidState(String),
}
