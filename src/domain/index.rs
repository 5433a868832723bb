//! Parent→children index over a flat row slice.
//!
//! Built once per resolution on a generational arena so that "has children",
//! descendant and ancestor queries are O(1)/O(subtree) instead of a scan of the
//! whole slice per row.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::error::TreeIssue;
use crate::domain::node::TreeRow;

/// What to do with a row whose `parent_id` matches no row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Never visible, together with its subtree.
    #[default]
    Exclude,
    /// Treated as an additional root at its input position.
    Root,
}

impl std::str::FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(OrphanPolicy::Exclude),
            "root" => Ok(OrphanPolicy::Root),
            other => Err(format!("unknown orphan policy: {other} (expected exclude|root)")),
        }
    }
}

/// Arena slot for one indexed row.
#[derive(Debug)]
pub struct IndexedRow {
    /// Position of the row in the input slice
    pub position: usize,
    /// Arena index of the parent, None for roots and orphans
    pub parent: Option<Index>,
    /// Arena indices of children, in input order
    pub children: Vec<Index>,
}

/// One step of a pre-order walk.
#[derive(Debug)]
pub struct Visit<'a, R> {
    pub row: &'a R,
    pub position: usize,
    /// Depth in the walk (roots = 0), independent of the row's stored level
    pub depth: usize,
    pub has_children: bool,
}

/// Read-only index over a borrowed row slice.
///
/// Duplicate ids: the first occurrence wins, later rows with the same id are
/// left out of the index entirely and are never visible.
#[derive(Debug)]
pub struct RowIndex<'a, R> {
    rows: &'a [R],
    arena: Arena<IndexedRow>,
    by_id: HashMap<&'a str, Index>,
    roots: Vec<Index>,
    reachable: HashSet<Index>,
    issues: Vec<TreeIssue>,
    policy: OrphanPolicy,
}

impl<'a, R: TreeRow> RowIndex<'a, R> {
    /// Index rows with the default orphan policy.
    pub fn build(rows: &'a [R]) -> Self {
        Self::with_policy(rows, OrphanPolicy::default())
    }

    #[instrument(level = "debug", skip(rows), fields(rows = rows.len()))]
    pub fn with_policy(rows: &'a [R], policy: OrphanPolicy) -> Self {
        let mut index = Self {
            rows,
            arena: Arena::with_capacity(rows.len()),
            by_id: HashMap::with_capacity(rows.len()),
            roots: Vec::new(),
            reachable: HashSet::with_capacity(rows.len()),
            issues: Vec::new(),
            policy,
        };

        let mut order = Vec::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            if index.by_id.contains_key(row.id()) {
                warn!(id = row.id(), position, "duplicate row id ignored");
                index.issues.push(TreeIssue::DuplicateId {
                    id: row.id().to_string(),
                    position,
                });
                continue;
            }
            let idx = index.arena.insert(IndexedRow {
                position,
                parent: None,
                children: Vec::new(),
            });
            index.by_id.insert(row.id(), idx);
            order.push(idx);
        }

        for idx in order {
            index.link(idx);
        }
        index.mark_reachable();
        index.detect_cycles();

        debug!(
            roots = index.roots.len(),
            reachable = index.reachable.len(),
            issues = index.issues.len(),
            "row index built"
        );
        index
    }

    fn link(&mut self, idx: Index) {
        let Some(position) = self.arena.get(idx).map(|n| n.position) else {
            return;
        };
        let rows: &'a [R] = self.rows;
        let row = &rows[position];
        match row.parent_id() {
            None => self.roots.push(idx),
            Some(parent_id) => match self.by_id.get(parent_id).copied() {
                Some(parent_idx) => {
                    if let Some(node) = self.arena.get_mut(idx) {
                        node.parent = Some(parent_idx);
                    }
                    if let Some(parent) = self.arena.get_mut(parent_idx) {
                        parent.children.push(idx);
                    }
                }
                None => {
                    warn!(id = row.id(), parent_id, policy = ?self.policy, "orphaned row");
                    self.issues.push(TreeIssue::Orphan {
                        id: row.id().to_string(),
                        parent_id: parent_id.to_string(),
                    });
                    if self.policy == OrphanPolicy::Root {
                        self.roots.push(idx);
                    }
                }
            },
        }
    }

    /// Walk every root fully, recording reachability and level mismatches.
    fn mark_reachable(&mut self) {
        let mut reached = HashSet::with_capacity(self.arena.len());
        let mut mismatches = Vec::new();
        for visit in self.walk(|_| true) {
            if let Some(&idx) = self.by_id.get(visit.row.id()) {
                reached.insert(idx);
            }
            let expected = match visit.row.parent_id().and_then(|p| self.get(p)) {
                Some(parent) => parent.level() + 1,
                // orphan promoted to root keeps whatever level it claims
                None if visit.row.parent_id().is_some() => visit.row.level(),
                None => 0,
            };
            if visit.row.level() != expected {
                mismatches.push(TreeIssue::LevelMismatch {
                    id: visit.row.id().to_string(),
                    level: visit.row.level(),
                    expected,
                });
            }
        }
        self.reachable = reached;
        self.issues.extend(mismatches);
    }

    /// Rows that are neither reachable nor below an orphan sit on a parent loop.
    fn detect_cycles(&mut self) {
        let mut reported: HashSet<Index> = HashSet::new();
        let mut cycles = Vec::new();
        for (idx, _) in self.arena.iter() {
            if self.reachable.contains(&idx) || reported.contains(&idx) {
                continue;
            }
            let mut chain = Vec::new();
            let mut seen = HashSet::new();
            let mut current = Some(idx);
            while let Some(cur) = current {
                if !seen.insert(cur) {
                    // cur is the first repeated node; everything from it on is the loop
                    let start = chain.iter().position(|&c| c == cur).unwrap_or(0);
                    if chain[start..].iter().all(|c| !reported.contains(c)) {
                        let id = self.row_at(cur).id().to_string();
                        warn!(id = %id, "cycle in parent references");
                        cycles.push(TreeIssue::Cycle(id));
                    }
                    reported.extend(chain[start..].iter().copied());
                    break;
                }
                chain.push(cur);
                current = self.arena.get(cur).and_then(|n| n.parent);
            }
        }
        self.issues.extend(cycles);
    }

    fn row_at(&self, idx: Index) -> &'a R {
        let rows: &'a [R] = self.rows;
        &rows[self.arena[idx].position]
    }

    /// The indexed input slice.
    pub fn rows(&self) -> &'a [R] {
        self.rows
    }

    pub fn policy(&self) -> OrphanPolicy {
        self.policy
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Malformed-input diagnostics collected while indexing.
    pub fn issues(&self) -> &[TreeIssue] {
        &self.issues
    }

    /// Row for an id (first occurrence for duplicates).
    pub fn get(&self, id: &str) -> Option<&'a R> {
        self.by_id.get(id).map(|&idx| self.row_at(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Whether any row names this id as its parent.
    pub fn has_children(&self, id: &str) -> bool {
        self.by_id
            .get(id)
            .and_then(|&idx| self.arena.get(idx))
            .is_some_and(|n| !n.children.is_empty())
    }

    /// Whether the row can become visible under the orphan policy.
    pub fn is_reachable(&self, id: &str) -> bool {
        self.by_id
            .get(id)
            .is_some_and(|idx| self.reachable.contains(idx))
    }

    /// Root rows in input order.
    pub fn roots(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.roots.iter().map(move |&idx| self.row_at(idx))
    }

    /// Direct children in input order.
    pub fn children(&self, id: &str) -> Vec<&'a R> {
        self.by_id
            .get(id)
            .and_then(|&idx| self.arena.get(idx))
            .map(|n| n.children.iter().map(|&c| self.row_at(c)).collect())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: &str) -> Option<&'a R> {
        let idx = *self.by_id.get(id)?;
        let parent = self.arena.get(idx)?.parent?;
        Some(self.row_at(parent))
    }

    /// Ancestor ids, nearest first. Stops at the first repeated id.
    pub fn ancestors(&self, id: &str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let Some(&start) = self.by_id.get(id) else {
            return out;
        };
        let mut seen = HashSet::from([start]);
        let mut current = self.arena.get(start).and_then(|n| n.parent);
        while let Some(idx) = current {
            if !seen.insert(idx) {
                break;
            }
            out.push(self.row_at(idx).id());
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        out
    }

    /// Descendant ids at any depth, pre-order. Excludes `id` itself.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants(&self, id: &str) -> Vec<&'a str> {
        let Some(&start) = self.by_id.get(id) else {
            return Vec::new();
        };
        Walk::from_start(self, vec![(start, 0)], |_: &R| true)
            .skip(1)
            .map(|v| v.row.id())
            .collect()
    }

    /// Pre-order walk from the roots, descending into a row's children only
    /// when `descend` returns true for it.
    pub fn walk<F>(&self, descend: F) -> Walk<'_, 'a, R, F>
    where
        F: FnMut(&R) -> bool,
    {
        let stack = self.roots.iter().rev().map(|&idx| (idx, 0)).collect();
        Walk::from_start(self, stack, descend)
    }

    /// Maximum depth over all reachable rows (a lone root is depth 1).
    pub fn depth(&self) -> usize {
        self.walk(|_| true).map(|v| v.depth + 1).max().unwrap_or(0)
    }

    /// Ids of reachable rows without children, pre-order.
    pub fn leaf_ids(&self) -> Vec<&'a str> {
        self.walk(|_| true)
            .filter(|v| !v.has_children)
            .map(|v| v.row.id())
            .collect()
    }
}

/// Iterative pre-order traversal with a current-path guard.
///
/// Refuses to re-enter an arena slot already on the descent path, so a
/// malformed parent loop cannot make the walk run forever.
pub struct Walk<'i, 'a, R, F> {
    index: &'i RowIndex<'a, R>,
    stack: Vec<(Index, usize)>,
    path: Vec<Index>,
    on_path: HashSet<Index>,
    descend: F,
}

impl<'i, 'a, R, F> Walk<'i, 'a, R, F>
where
    R: TreeRow,
    F: FnMut(&R) -> bool,
{
    fn from_start(index: &'i RowIndex<'a, R>, stack: Vec<(Index, usize)>, descend: F) -> Self {
        Self {
            index,
            stack,
            path: Vec::new(),
            on_path: HashSet::new(),
            descend,
        }
    }
}

impl<'i, 'a, R, F> Iterator for Walk<'i, 'a, R, F>
where
    R: TreeRow,
    F: FnMut(&R) -> bool,
{
    type Item = Visit<'a, R>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth)) = self.stack.pop() {
            if self.path.len() > depth {
                for left in self.path.drain(depth..) {
                    self.on_path.remove(&left);
                }
            }
            if self.on_path.contains(&idx) {
                warn!(depth, "cycle guard: refusing to re-enter row on current path");
                continue;
            }
            let Some(node) = self.index.arena.get(idx) else {
                continue;
            };
            let row = self.index.row_at(idx);
            if (self.descend)(row) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
            }
            self.path.push(idx);
            self.on_path.insert(idx);
            return Some(Visit {
                row,
                position: node.position,
                depth,
                has_children: !node.children.is_empty(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::Row;

    fn bom() -> Vec<Row> {
        vec![
            Row::root("P1"),
            Row::child("C1", "P1", 1),
            Row::child("G1", "C1", 2),
            Row::child("C2", "P1", 1),
            Row::root("P2"),
        ]
    }

    #[test]
    fn given_rows_when_indexing_then_children_keep_input_order() {
        let rows = bom();
        let index = RowIndex::build(&rows);

        let children: Vec<_> = index.children("P1").into_iter().map(|r| r.id()).collect();
        assert_eq!(children, vec!["C1", "C2"]);
        assert!(index.has_children("C1"));
        assert!(!index.has_children("C2"));
        assert!(index.issues().is_empty());
    }

    #[test]
    fn given_rows_when_walking_fully_then_visits_in_preorder() {
        let rows = bom();
        let index = RowIndex::build(&rows);

        let ids: Vec<_> = index.walk(|_| true).map(|v| v.row.id()).collect();
        assert_eq!(ids, vec!["P1", "C1", "G1", "C2", "P2"]);
        assert_eq!(index.depth(), 3);
        assert_eq!(index.leaf_ids(), vec!["G1", "C2", "P2"]);
    }

    #[test]
    fn given_chain_when_querying_relatives_then_returns_ancestors_and_descendants() {
        let rows = bom();
        let index = RowIndex::build(&rows);

        assert_eq!(index.ancestors("G1"), vec!["C1", "P1"]);
        assert_eq!(index.descendants("P1"), vec!["C1", "G1", "C2"]);
        assert!(index.descendants("unknown").is_empty());
        assert_eq!(index.parent("G1").map(|r| r.id()), Some("C1"));
    }

    #[test]
    fn given_two_node_loop_when_indexing_then_reports_single_cycle() {
        let rows = vec![Row::child("A", "B", 1), Row::child("B", "A", 1)];
        let index = RowIndex::build(&rows);

        let cycles: Vec<_> = index
            .issues()
            .iter()
            .filter(|i| matches!(i, TreeIssue::Cycle(_)))
            .collect();
        assert_eq!(cycles.len(), 1);
        assert!(!index.is_reachable("A"));
        assert!(!index.is_reachable("B"));
        assert_eq!(index.ancestors("A"), vec!["B"]);
    }

    #[test]
    fn given_deep_chain_when_walking_then_visits_every_level_once() {
        let mut rows = vec![Row::root("n0")];
        for i in 1..20_000 {
            rows.push(Row::child(format!("n{i}"), format!("n{}", i - 1), i));
        }
        let index = RowIndex::build(&rows);

        let depths: Vec<_> = index.walk(|_| true).map(|v| v.depth).collect();

        assert_eq!(depths.len(), rows.len());
        assert!(depths.iter().enumerate().all(|(i, &d)| i == d));
        assert_eq!(index.depth(), rows.len());
        assert_eq!(index.descendants("n19990").len(), 9);
    }

    #[test]
    fn given_loop_member_when_collecting_descendants_then_stops_at_repeat() {
        let rows = vec![
            Row::child("A", "B", 1),
            Row::child("B", "A", 1),
            Row::child("C", "A", 2),
        ];
        let index = RowIndex::build(&rows);

        assert_eq!(index.descendants("A"), vec!["B", "C"]);
    }

    #[test]
    fn given_wrong_level_when_indexing_then_reports_mismatch() {
        let rows = vec![Row::root("P1"), Row::child("C1", "P1", 3)];
        let index = RowIndex::build(&rows);

        assert_eq!(
            index.issues(),
            &[TreeIssue::LevelMismatch {
                id: "C1".into(),
                level: 3,
                expected: 1
            }]
        );
    }

    #[test]
    fn given_policy_strings_when_parsing_then_accepts_known_values() {
        assert_eq!("Root".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Root));
        assert_eq!("exclude".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Exclude));
        assert!("drop".parse::<OrphanPolicy>().is_err());
    }
}
