//! Node store: the capability trait the engine works over and a concrete row type.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability set the engine needs from a row.
///
/// Everything else on the row is opaque and passed through untouched, so the
/// same engine serves BOM, demand-aggregation and supplier-execution rows.
pub trait TreeRow {
    /// Identity, unique across the input slice.
    fn id(&self) -> &str;

    /// Identity of the parent row, `None` for roots.
    fn parent_id(&self) -> Option<&str>;

    /// Depth from the root (root = 0).
    fn level(&self) -> usize;
}

impl<T: TreeRow + ?Sized> TreeRow for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn parent_id(&self) -> Option<&str> {
        (**self).parent_id()
    }

    fn level(&self) -> usize {
        (**self).level()
    }
}

/// Row with opaque domain fields, as loaded from JSON or TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub level: usize,
    /// Domain fields, never read by the engine.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Row {
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            level: 0,
            fields: Map::new(),
        }
    }

    pub fn child(id: impl Into<String>, parent_id: impl Into<String>, level: usize) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            level,
            fields: Map::new(),
        }
    }

    /// Attach a domain field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Render a field for display; strings are shown without quotes.
    pub fn field_display(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

impl TreeRow for Row {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    fn level(&self) -> usize {
        self.level
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
