//! Expansion state: the set of node ids currently open.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

/// Immutable set of expanded node ids.
///
/// Every change produces a new value; a set handed to a render is never
/// updated underneath it. Membership of a childless id is inert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    ids: BTreeSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// New set with `ids` added.
    pub fn with<'s>(&self, ids: impl IntoIterator<Item = &'s str>) -> Self {
        let mut next = self.ids.clone();
        next.extend(ids.into_iter().map(str::to_string));
        Self { ids: next }
    }

    /// New set with `ids` removed.
    pub fn without<'s>(&self, ids: impl IntoIterator<Item = &'s str>) -> Self {
        let mut next = self.ids.clone();
        for id in ids {
            next.remove(id);
        }
        Self { ids: next }
    }
}

impl<S: Into<String>> FromIterator<S> for ExpansionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ExpansionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.ids.iter().join(", "))
    }
}
