//! Column augmenter: the injected toggle column and its per-row cells.

use tracing::debug;

use crate::domain::expansion::ExpansionSet;
use crate::domain::index::RowIndex;
use crate::domain::node::TreeRow;
use crate::domain::toggle::toggle_indexed;

/// Key of the injected column, distinct from any domain column.
pub const TOGGLE_COLUMN_KEY: &str = "__tree_toggle";

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    /// Event was not handled; the grid may run its own row handler.
    #[default]
    Ignored,
    /// Event was handled but the grid may still see it.
    Handled,
    /// Event was handled and must not propagate to row-level handlers.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled (not Ignored).
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }

    /// Whether the grid must skip its own handler for the same click.
    pub fn stops_propagation(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// State of the toggle control in one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleControl {
    /// Row has no children: inert spacer with the control's footprint.
    Placeholder,
    Collapsed,
    Expanded,
}

impl ToggleControl {
    pub fn glyph(&self) -> &'static str {
        match self {
            ToggleControl::Placeholder => " ",
            ToggleControl::Collapsed => "▶",
            ToggleControl::Expanded => "▼",
        }
    }

    pub fn is_interactive(&self) -> bool {
        !matches!(self, ToggleControl::Placeholder)
    }
}

/// Rendered toggle cell for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleCell {
    pub control: ToggleControl,
    /// Leading offset in cells: `level * indent_unit`.
    pub indent: u16,
    /// Footprint of the control, identical for placeholders.
    pub width: u16,
}

impl ToggleCell {
    /// Text rendering: indentation, glyph, padding up to the control width.
    pub fn render(&self) -> String {
        let pad = usize::from(self.width.saturating_sub(1));
        format!(
            "{}{}{}",
            " ".repeat(usize::from(self.indent)),
            self.control.glyph(),
            " ".repeat(pad)
        )
    }
}

/// Self-contained descriptor of the toggle column.
///
/// Never reads or writes domain fields; it only looks at the tree shape and
/// the expansion state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleColumn {
    pub key: &'static str,
    pub header: String,
    /// Width of the control in cells.
    pub width: u16,
    /// Cells of indentation per level.
    pub indent_unit: u16,
}

impl Default for ToggleColumn {
    fn default() -> Self {
        Self {
            key: TOGGLE_COLUMN_KEY,
            header: String::new(),
            width: 2,
            indent_unit: 2,
        }
    }
}

impl ToggleColumn {
    pub fn new(width: u16, indent_unit: u16) -> Self {
        Self {
            width: width.max(1),
            indent_unit,
            ..Self::default()
        }
    }

    /// Cell for `row`, judged against the whole index, not the visible subset.
    pub fn cell<R: TreeRow>(
        &self,
        index: &RowIndex<'_, R>,
        row: &R,
        expansion: &ExpansionSet,
    ) -> ToggleCell {
        let control = if !index.has_children(row.id()) {
            ToggleControl::Placeholder
        } else if expansion.contains(row.id()) {
            ToggleControl::Expanded
        } else {
            ToggleControl::Collapsed
        };
        let level = u16::try_from(row.level()).unwrap_or(u16::MAX);
        ToggleCell {
            control,
            indent: level.saturating_mul(self.indent_unit),
            width: self.width,
        }
    }

    /// Handle a click on the control of `node_id`.
    ///
    /// Returns the replacement expansion set and `Consumed`, so the host grid
    /// does not also fire its row selection/drill-down for the same click.
    /// Placeholders and rows that can never be visible ignore the click and
    /// return the set unchanged.
    pub fn click<R: TreeRow>(
        &self,
        index: &RowIndex<'_, R>,
        node_id: &str,
        expansion: &ExpansionSet,
    ) -> (ExpansionSet, EventResult) {
        if !index.has_children(node_id) || !index.is_reachable(node_id) {
            debug!(node_id, "click on inert control ignored");
            return (expansion.clone(), EventResult::Ignored);
        }
        (
            toggle_indexed(index, node_id, expansion),
            EventResult::Consumed,
        )
    }
}

/// A column of the augmented grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridColumn<C> {
    Toggle(ToggleColumn),
    Domain(C),
}

impl<C> GridColumn<C> {
    pub fn is_toggle(&self) -> bool {
        matches!(self, GridColumn::Toggle(_))
    }

    pub fn domain(&self) -> Option<&C> {
        match self {
            GridColumn::Domain(c) => Some(c),
            GridColumn::Toggle(_) => None,
        }
    }
}

/// Prepend the default toggle column to the caller's columns.
pub fn augment<C>(columns: impl IntoIterator<Item = C>) -> Vec<GridColumn<C>> {
    augment_with(ToggleColumn::default(), columns)
}

/// Prepend `toggle` to the caller's columns; domain columns are moved through
/// unchanged and in order.
pub fn augment_with<C>(
    toggle: ToggleColumn,
    columns: impl IntoIterator<Item = C>,
) -> Vec<GridColumn<C>> {
    std::iter::once(GridColumn::Toggle(toggle))
        .chain(columns.into_iter().map(GridColumn::Domain))
        .collect()
}
