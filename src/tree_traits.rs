//! Conversion of an indexed row hierarchy into printable `termtree` trees.

use std::collections::HashSet;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{classify, RowIndex, TreeRow};

pub trait TermTreeConvert {
    /// One printable tree per root, labelled `id [category]`.
    fn to_term_trees(&self) -> Vec<Tree<String>>;
}

impl<R: TreeRow> TermTreeConvert for RowIndex<'_, R> {
    #[instrument(level = "debug", skip(self))]
    fn to_term_trees(&self) -> Vec<Tree<String>> {
        fn build<R: TreeRow>(
            index: &RowIndex<'_, R>,
            row: &R,
            path: &mut HashSet<String>,
        ) -> Tree<String> {
            let label = format!("{} [{}]", row.id(), classify(row, index));
            path.insert(row.id().to_string());
            let mut leaves = Vec::new();
            for child in index.children(row.id()) {
                if !path.contains(child.id()) {
                    leaves.push(build(index, child, path));
                }
            }
            path.remove(row.id());
            Tree::new(label).with_leaves(leaves)
        }

        let mut path = HashSet::new();
        self.roots()
            .map(|root| build(self, root, &mut path))
            .collect()
    }
}
