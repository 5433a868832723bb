//! Row classifier: presentation bucket from level and child presence.

use std::fmt;

use crate::domain::index::RowIndex;
use crate::domain::node::TreeRow;

/// Style bucket for a row. Visual constants live with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowCategory {
    /// Level 0 with children
    RootParent,
    /// Level 0 without children
    Root,
    Child,
    Grandchild,
    /// Level 3 and deeper
    Descendant(usize),
}

impl RowCategory {
    /// Pure function of level and child presence.
    pub fn from_shape(level: usize, has_children: bool) -> Self {
        match (level, has_children) {
            (0, true) => RowCategory::RootParent,
            (0, false) => RowCategory::Root,
            (1, _) => RowCategory::Child,
            (2, _) => RowCategory::Grandchild,
            (n, _) => RowCategory::Descendant(n),
        }
    }

    /// Stable bucket name for styling.
    pub fn bucket(&self) -> String {
        match self {
            RowCategory::RootParent => "root-parent".into(),
            RowCategory::Root => "root".into(),
            RowCategory::Child => "child".into(),
            RowCategory::Grandchild => "grandchild".into(),
            RowCategory::Descendant(n) => format!("level-{n}"),
        }
    }
}

impl fmt::Display for RowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bucket())
    }
}

pub fn classify<R: TreeRow>(row: &R, index: &RowIndex<'_, R>) -> RowCategory {
    RowCategory::from_shape(row.level(), index.has_children(row.id()))
}

/// Classify straight from a slice; builds a throwaway index.
pub fn classify_in<R: TreeRow>(row: &R, rows: &[R]) -> RowCategory {
    classify(row, &RowIndex::build(rows))
}
