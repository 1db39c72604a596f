//! Merge operators shared by the set-valued analyses.
use std::collections::BTreeSet;

/// Union of all `facts`. Empty when there are no facts.
pub fn union<T: Ord + Clone>(facts: &[&BTreeSet<T>]) -> BTreeSet<T> {
    facts.iter().flat_map(|f| f.iter().cloned()).collect()
}

/// Intersection of all `facts`. Empty when there are no facts.
pub fn intersection<T: Ord + Clone>(facts: &[&BTreeSet<T>]) -> BTreeSet<T> {
    let Some((first, rest)) = facts.split_first() else {
        return BTreeSet::new();
    };
    first
        .iter()
        .filter(|elem| rest.iter().all(|f| f.contains(*elem)))
        .cloned()
        .collect()
}
