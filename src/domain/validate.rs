//! Optional strict checks for flat records.
//!
//! `list_to_tree` drops orphans and `HierarchyIndex` lets the last duplicate
//! win without complaint. Callers that cannot tolerate either run these
//! checks first.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use itertools::Itertools;

use crate::domain::error::DomainError;

/// Ids of records whose declared parent id has no record.
pub fn find_orphans<T, Id, I, P>(records: &[T], id_of: I, parent_id_of: P) -> Vec<Id>
where
    Id: Eq + Hash,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
{
    let known: HashSet<Id> = records.iter().map(&id_of).collect();
    records
        .iter()
        .filter(|record| parent_id_of(*record).is_some_and(|parent| !known.contains(&parent)))
        .map(&id_of)
        .collect()
}

/// Ids occurring on more than one record, in order of first repetition.
pub fn find_duplicate_ids<T, Id, I>(records: &[T], id_of: I) -> Vec<Id>
where
    Id: Eq + Hash + Clone,
    I: Fn(&T) -> Id,
{
    let mut counts: HashMap<Id, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for id in records.iter().map(&id_of) {
        let count = counts.entry(id.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Fails on duplicate ids first, then on orphans.
pub fn validate_records<T, Id, I, P>(records: &[T], id_of: I, parent_id_of: P) -> Result<(), DomainError>
where
    Id: Eq + Hash + Clone + Display,
    I: Fn(&T) -> Id,
    P: Fn(&T) -> Option<Id>,
{
    let duplicates = find_duplicate_ids(records, &id_of);
    if !duplicates.is_empty() {
        return Err(DomainError::DuplicateIds(
            duplicates.iter().map(ToString::to_string).collect(),
        ));
    }
    let orphans = find_orphans(records, &id_of, &parent_id_of);
    if !orphans.is_empty() {
        return Err(DomainError::OrphanRecords(
            orphans.iter().map(ToString::to_string).collect(),
        ));
    }
    Ok(())
}

/// Comma separated listing used in error messages.
pub(crate) fn join_ids(ids: &[String]) -> String {
    ids.iter().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(u32, Option<u32>)> {
        vec![(1, None), (2, Some(1)), (3, Some(99)), (2, Some(1)), (4, Some(3))]
    }

    #[test]
    fn test_find_orphans_only_reports_missing_parents() {
        // 4 hangs below orphan 3 but its own parent exists
        assert_eq!(find_orphans(&rows(), |r| r.0, |r| r.1), vec![3]);
    }

    #[test]
    fn test_find_duplicates_reports_once() {
        let mut rows = rows();
        rows.push((2, None));
        assert_eq!(find_duplicate_ids(&rows, |r| r.0), vec![2]);
    }

    #[test]
    fn test_validate_reports_duplicates_before_orphans() {
        let err = validate_records(&rows(), |r| r.0, |r| r.1).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateIds(ids) if ids == vec!["2".to_string()]));
    }
}
