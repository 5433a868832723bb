//! Domain-level errors and malformed-input diagnostics (no external dependencies)

use thiserror::Error;

/// Malformed input found while indexing rows.
///
/// These are diagnostics, not failures: the resolver stays total and applies
/// the documented policy for each kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeIssue {
    #[error("orphaned row {id}: parent {parent_id} does not exist")]
    Orphan { id: String, parent_id: String },

    #[error("cycle detected in hierarchy at: {0}")]
    Cycle(String),

    #[error("duplicate id {id} at row {position}, first occurrence kept")]
    DuplicateId { id: String, position: usize },

    #[error("row {id} has level {level}, expected {expected}")]
    LevelMismatch {
        id: String,
        level: usize,
        expected: usize,
    },
}

impl TreeIssue {
    /// Id of the row the issue is about.
    pub fn id(&self) -> &str {
        match self {
            TreeIssue::Orphan { id, .. }
            | TreeIssue::DuplicateId { id, .. }
            | TreeIssue::LevelMismatch { id, .. } => id,
            TreeIssue::Cycle(id) => id,
        }
    }
}

/// Domain errors represent contract violations by the caller.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("row file contains no rows: {0}")]
    EmptyInput(String),

    #[error("unknown row id: {0}")]
    UnknownId(String),

    #[error("malformed hierarchy: {} issue(s)", .0.len())]
    Malformed(Vec<TreeIssue>),
}
