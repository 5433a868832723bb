//! Toggle controller: expand/collapse with cascade, plus bulk operations.
//!
//! Every operation returns a new [`ExpansionSet`] and keeps the
//! ancestor-closure invariant: an expanded node's parent is expanded too.

use tracing::{debug, instrument};

use crate::domain::expansion::ExpansionSet;
use crate::domain::index::RowIndex;
use crate::domain::node::TreeRow;

/// Flip the expansion state of `node_id`.
pub fn toggle<R: TreeRow>(rows: &[R], node_id: &str, expansion: &ExpansionSet) -> ExpansionSet {
    toggle_indexed(&RowIndex::build(rows), node_id, expansion)
}

/// Flip the expansion state of `node_id` using a prebuilt index.
///
/// - collapsed → expanded; a hidden node also gets its ancestor chain expanded
/// - expanded → collapsed together with every descendant, so re-expanding it
///   later shows only its immediate children
/// - unknown, childless or unreachable ids leave the set unchanged
#[instrument(level = "debug", skip(index, expansion))]
pub fn toggle_indexed<R: TreeRow>(
    index: &RowIndex<'_, R>,
    node_id: &str,
    expansion: &ExpansionSet,
) -> ExpansionSet {
    if !index.has_children(node_id) || !index.is_reachable(node_id) {
        debug!("toggle is a no-op");
        return expansion.clone();
    }

    if expansion.contains(node_id) {
        let descendants = index.descendants(node_id);
        debug!(cascade = descendants.len(), "collapse");
        expansion.without(std::iter::once(node_id).chain(descendants))
    } else {
        let ancestors = index.ancestors(node_id);
        debug!(ancestors = ancestors.len(), "expand");
        expansion.with(std::iter::once(node_id).chain(ancestors))
    }
}

/// Expand the ancestor chain of `node_id` so that it becomes visible.
///
/// The node itself keeps its state. Returns `None` for ids that are unknown or
/// can never be visible.
pub fn reveal<R: TreeRow>(
    index: &RowIndex<'_, R>,
    node_id: &str,
    expansion: &ExpansionSet,
) -> Option<ExpansionSet> {
    if !index.is_reachable(node_id) {
        return None;
    }
    Some(expansion.with(index.ancestors(node_id)))
}

/// Every reachable node that has children.
pub fn expand_all<R: TreeRow>(index: &RowIndex<'_, R>) -> ExpansionSet {
    index
        .walk(|_| true)
        .filter(|v| v.has_children)
        .map(|v| v.row.id())
        .collect()
}

/// The empty set.
pub fn collapse_all() -> ExpansionSet {
    ExpansionSet::new()
}

/// Show `depth` levels below the roots: every reachable parent at walk depth
/// below `depth` is expanded.
pub fn expand_to_level<R: TreeRow>(index: &RowIndex<'_, R>, depth: usize) -> ExpansionSet {
    index
        .walk(|_| true)
        .filter(|v| v.has_children && v.depth < depth)
        .map(|v| v.row.id())
        .collect()
}

/// Check the ancestor-closure invariant for `expansion`.
///
/// Inert members (unknown or childless ids) are ignored.
pub fn closure_holds<R: TreeRow>(index: &RowIndex<'_, R>, expansion: &ExpansionSet) -> bool {
    expansion
        .iter()
        .filter(|id| index.has_children(id))
        .all(|id| {
            index.is_reachable(id)
                && index
                    .ancestors(id)
                    .iter()
                    .all(|ancestor| expansion.contains(ancestor))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::Row;

    fn set(ids: &[&str]) -> ExpansionSet {
        ids.iter().copied().collect()
    }

    fn chain() -> Vec<Row> {
        vec![
            Row::root("P1"),
            Row::child("C1", "P1", 1),
            Row::child("G1", "C1", 2),
            Row::child("X1", "G1", 3),
        ]
    }

    #[test]
    fn given_hidden_node_when_toggling_then_expands_ancestors_too() {
        let rows = chain();
        let index = RowIndex::build(&rows);

        let next = toggle_indexed(&index, "G1", &ExpansionSet::new());
        assert_eq!(next, set(&["P1", "C1", "G1"]));
        assert!(closure_holds(&index, &next));
    }

    #[test]
    fn given_nested_expansion_when_collapsing_middle_then_drops_subtree_only() {
        let rows = chain();
        let index = RowIndex::build(&rows);
        let full: ExpansionSet = set(&["P1", "C1", "G1"]);

        let next = toggle_indexed(&index, "C1", &full);
        assert_eq!(next, set(&["P1"]));
    }

    #[test]
    fn given_levels_when_expanding_to_level_then_opens_only_shallow_parents() {
        let rows = chain();
        let index = RowIndex::build(&rows);

        assert_eq!(expand_to_level(&index, 0), ExpansionSet::new());
        assert_eq!(expand_to_level(&index, 2), set(&["P1", "C1"]));
        assert_eq!(expand_all(&index), set(&["P1", "C1", "G1"]));
    }

    #[test]
    fn given_deep_node_when_revealing_then_node_itself_stays_collapsed() {
        let rows = chain();
        let index = RowIndex::build(&rows);

        let next = reveal(&index, "X1", &ExpansionSet::new()).expect("reachable");
        assert_eq!(next, set(&["P1", "C1", "G1"]));
        assert!(reveal(&index, "nope", &next).is_none());
    }

    #[test]
    fn given_broken_closure_when_checking_then_detects_it() {
        let rows = chain();
        let index = RowIndex::build(&rows);
        let broken: ExpansionSet = set(&["C1"]);

        assert!(!closure_holds(&index, &broken));
        assert!(closure_holds(&index, &collapse_all()));
    }
}
