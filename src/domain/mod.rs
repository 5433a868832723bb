//! Domain layer: the tree expansion engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod classify;
pub mod columns;
pub mod error;
pub mod expansion;
pub mod index;
pub mod node;
pub mod resolver;
pub mod toggle;

pub use classify::{classify, classify_in, RowCategory};
pub use columns::{
    augment, augment_with, EventResult, GridColumn, ToggleCell, ToggleColumn, ToggleControl,
    TOGGLE_COLUMN_KEY,
};
pub use error::{DomainError, TreeIssue};
pub use expansion::ExpansionSet;
pub use index::{OrphanPolicy, RowIndex, Visit};
pub use node::{Row, TreeRow};
pub use resolver::{resolve, resolve_indexed, FlatRow};
pub use toggle::{
    closure_holds, collapse_all, expand_all, expand_to_level, reveal, toggle, toggle_indexed,
};

/// All malformed-input diagnostics for `rows` under `policy`.
pub fn validate<R: TreeRow>(rows: &[R], policy: OrphanPolicy) -> Vec<TreeIssue> {
    RowIndex::with_policy(rows, policy).issues().to_vec()
}

/// Like [`validate`], but as an error when any issue exists.
pub fn validate_strict<R: TreeRow>(rows: &[R], policy: OrphanPolicy) -> Result<(), DomainError> {
    let issues = validate(rows, policy);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Malformed(issues))
    }
}
