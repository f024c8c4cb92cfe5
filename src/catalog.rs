//! Canonical descriptors for views and their indexes.
//!
//! A [`ViewDescriptor`] is synthesized on demand from live catalog queries;
//! it is never persisted by this crate. Index metadata only appears on
//! materialized views, which are the only views that can carry indexes.

use serde::{Deserialize, Serialize};

/// What kind of view an object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Named stored query with no persisted result, re-evaluated on each read
    #[serde(rename = "view")]
    Ordinary,
    /// Stored query whose result set is persisted and explicitly refreshed
    Materialized,
}

impl ViewKind {
    pub fn is_materialized(self) -> bool {
        matches!(self, ViewKind::Materialized)
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Ordinary => write!(f, "view"),
            ViewKind::Materialized => write!(f, "materialized"),
        }
    }
}

/// The canonical representation of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    /// Identifier, unique among views and tables in the active schema
    pub name: String,
    /// The SQL that would follow `AS` in a `CREATE VIEW` statement, with the
    /// trailing terminator and surrounding whitespace stripped
    pub definition: String,
    pub kind: ViewKind,
    /// Non-empty only when `kind` is materialized
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDescriptor>,
}

impl ViewDescriptor {
    pub fn new(name: &str, definition: &str, kind: ViewKind) -> Self {
        ViewDescriptor {
            name: name.to_string(),
            definition: definition.to_string(),
            kind,
            indexes: Vec::new(),
        }
    }
}

/// An index on a materialized view, in the same shape the general table
/// index model uses. Per-column options hold entries only for columns that
/// deviate from the backend default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    /// Partial-index predicate (the `WHERE` clause), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_predicate: Option<String>,
    /// Column -> sort order, for columns not using the default order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<(String, String)>,
    /// Column -> prefix length, for backends with prefix indexes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lengths: Vec<(String, u32)>,
    /// Column -> operator class, for columns not using the default class
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operator_classes: Vec<(String, String)>,
    /// Storage method, when not the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using: Option<String>,
}

impl IndexDescriptor {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        IndexDescriptor {
            name: name.to_string(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn partial(mut self, predicate: &str) -> Self {
        self.where_predicate = Some(predicate.to_string());
        self
    }
}
