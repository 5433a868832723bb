//! Tree grid service: current expansion state plus the render-ready view.

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    augment_with, classify, expand_all, expand_to_level, resolve_indexed, reveal, DomainError,
    EventResult, ExpansionSet, FlatRow, GridColumn, OrphanPolicy, RowCategory, RowIndex,
    ToggleCell, ToggleColumn, TreeIssue, TreeRow,
};

/// A visible row with everything the grid needs to paint it.
#[derive(Debug, Clone)]
pub struct GridRow<'a, R> {
    pub flat: FlatRow<'a, R>,
    pub category: RowCategory,
    pub toggle: ToggleCell,
}

/// Output handed to the external grid renderer.
#[derive(Debug, Clone)]
pub struct GridView<'a, R, C> {
    /// Visible rows in render order.
    pub rows: Vec<GridRow<'a, R>>,
    /// Toggle column followed by the caller's columns.
    pub columns: Vec<GridColumn<C>>,
    /// Malformed-input diagnostics for this data set.
    pub issues: Vec<TreeIssue>,
}

impl<'a, R: TreeRow, C> GridView<'a, R, C> {
    pub fn visible_ids(&self) -> Vec<&'a str> {
        self.rows.iter().map(|r| r.flat.row.id()).collect()
    }

    /// Category of a visible row.
    pub fn category(&self, id: &str) -> Option<RowCategory> {
        self.rows
            .iter()
            .find(|r| r.flat.row.id() == id)
            .map(|r| r.category)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Engine state for one tree-shaped table.
///
/// Rows are supplied fresh on every call and never stored; only the
/// expansion set lives here, and it is replaced wholesale on every change.
#[derive(Debug, Clone, Default)]
pub struct TreeGrid {
    expansion: ExpansionSet,
    toggle: ToggleColumn,
    policy: OrphanPolicy,
}

impl TreeGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            expansion: ExpansionSet::new(),
            toggle: ToggleColumn::new(settings.toggle_width, settings.indent_unit),
            policy: settings.orphan_policy,
        }
    }

    pub fn with_expansion(mut self, expansion: ExpansionSet) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_policy(mut self, policy: OrphanPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    pub fn policy(&self) -> OrphanPolicy {
        self.policy
    }

    pub fn toggle_column(&self) -> &ToggleColumn {
        &self.toggle
    }

    pub fn index<'a, R: TreeRow>(&self, rows: &'a [R]) -> RowIndex<'a, R> {
        RowIndex::with_policy(rows, self.policy)
    }

    /// Visible rows, augmented columns and categories for the current state.
    #[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn view<'a, R: TreeRow, C>(
        &self,
        rows: &'a [R],
        columns: impl IntoIterator<Item = C>,
    ) -> GridView<'a, R, C> {
        let index = self.index(rows);
        let visible = resolve_indexed(&index, &self.expansion)
            .into_iter()
            .map(|flat| GridRow {
                category: classify(flat.row, &index),
                toggle: self.toggle.cell(&index, flat.row, &self.expansion),
                flat,
            })
            .collect();
        GridView {
            rows: visible,
            columns: augment_with(self.toggle.clone(), columns),
            issues: index.issues().to_vec(),
        }
    }

    /// Click on the toggle control of `node_id`.
    ///
    /// `Consumed` tells the grid not to run its own row handler for this click.
    #[instrument(level = "debug", skip(self, rows))]
    pub fn on_toggle_click<R: TreeRow>(&mut self, rows: &[R], node_id: &str) -> EventResult {
        let index = self.index(rows);
        let (next, result) = self.toggle.click(&index, node_id, &self.expansion);
        debug!(before = %self.expansion, after = %next, ?result, "toggle click");
        self.expansion = next;
        result
    }

    pub fn expand_all<R: TreeRow>(&mut self, rows: &[R]) {
        self.expansion = expand_all(&self.index(rows));
        info!(expanded = self.expansion.len(), "expanded all");
    }

    pub fn collapse_all(&mut self) {
        self.expansion = ExpansionSet::new();
    }

    pub fn expand_to_level<R: TreeRow>(&mut self, rows: &[R], depth: usize) {
        self.expansion = expand_to_level(&self.index(rows), depth);
    }

    /// Expand the ancestors of `node_id` so that it becomes visible.
    pub fn reveal<R: TreeRow>(&mut self, rows: &[R], node_id: &str) -> ApplicationResult<()> {
        let index = self.index(rows);
        let next = reveal(&index, node_id, &self.expansion).ok_or_else(|| {
            ApplicationError::from(DomainError::UnknownId(node_id.to_string()))
        })?;
        self.expansion = next;
        Ok(())
    }

    /// Drop all expansion state, e.g. when the host swaps in another tree.
    pub fn reset(&mut self) {
        self.expansion = ExpansionSet::new();
    }
}
