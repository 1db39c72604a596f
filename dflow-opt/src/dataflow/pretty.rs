use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Rendering of an empty fact.
pub const EMPTY: &str = "∅";

/// Textual form of a dataflow fact, as printed in analysis reports.
///
/// Sets print their elements separated by `, ` and maps print `key: value`
/// pairs. Both are in sorted order, and an empty fact prints as [EMPTY].
pub trait PrettyFact {
    fn pretty(&self) -> String;
}

impl<T: Display> PrettyFact for BTreeSet<T> {
    fn pretty(&self) -> String {
        if self.is_empty() {
            return EMPTY.to_string();
        }
        self.iter().join(", ")
    }
}

impl<K: Display, V: Display> PrettyFact for BTreeMap<K, V> {
    fn pretty(&self) -> String {
        if self.is_empty() {
            return EMPTY.to_string();
        }
        self.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")
    }
}
