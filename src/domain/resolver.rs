//! Visibility resolver: which rows are rendered, in which order.

use tracing::{debug, instrument};

use crate::domain::expansion::ExpansionSet;
use crate::domain::index::RowIndex;
use crate::domain::node::TreeRow;

/// A visible row in the flattened output.
#[derive(Debug, Clone)]
pub struct FlatRow<'a, R> {
    /// The row itself, borrowed from the input slice.
    pub row: &'a R,
    /// Position in the input slice.
    pub position: usize,
    /// Depth in the visible tree (0 = root).
    pub depth: usize,
    /// Whether any row names this one as parent.
    pub has_children: bool,
    /// Whether its children are currently shown.
    pub is_expanded: bool,
}

impl<R: TreeRow> FlatRow<'_, R> {
    pub fn id(&self) -> &str {
        self.row.id()
    }
}

/// Ordered visible subset of `rows` for the given expansion state.
///
/// Roots are always visible; any other row is visible iff its parent is
/// visible and expanded. Pre-order, siblings in input order. Never fails:
/// orphans follow the default policy (excluded), loops are cut.
pub fn resolve<'a, R: TreeRow>(rows: &'a [R], expansion: &ExpansionSet) -> Vec<FlatRow<'a, R>> {
    let index = RowIndex::build(rows);
    resolve_indexed(&index, expansion)
}

/// Same as [`resolve`] over a prebuilt index (keeps the index's orphan policy).
#[instrument(level = "debug", skip_all, fields(rows = index.rows().len(), expanded = expansion.len()))]
pub fn resolve_indexed<'a, R: TreeRow>(
    index: &RowIndex<'a, R>,
    expansion: &ExpansionSet,
) -> Vec<FlatRow<'a, R>> {
    let visible: Vec<_> = index
        .walk(|row| expansion.contains(row.id()))
        .map(|visit| FlatRow {
            row: visit.row,
            position: visit.position,
            depth: visit.depth,
            has_children: visit.has_children,
            is_expanded: visit.has_children && expansion.contains(visit.row.id()),
        })
        .collect();
    debug!(visible = visible.len(), "resolved visible rows");
    visible
}
