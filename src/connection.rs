//! Connection seam between this crate and the surrounding access layer.
//!
//! Every operation in this crate is request/response over one logical
//! connection: the caller hands in something implementing [`Connection`],
//! the operation issues DDL or catalog queries through it, and nothing is
//! retained afterwards. Pooling, transactions and timeouts belong to the
//! connection owner, not here.

use crate::error::ViewResult;

/// A single result row with named columns.
///
/// Values are carried as text, the way catalog queries return them; a `None`
/// value is SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, Option<&str>)]) -> Self {
        Row {
            columns: pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), value.map(str::to_string)))
                .collect(),
        }
    }

    pub fn push(&mut self, column: &str, value: Option<&str>) {
        self.columns.push((column.to_string(), value.map(str::to_string)));
    }

    /// Value of the named column. `None` for NULL and for absent columns.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Live database connection handle, implemented by the surrounding framework.
pub trait Connection {
    /// Execute arbitrary DDL/DML text and return the result rows.
    /// `label` is a short human-readable tag for logging/instrumentation.
    fn execute(&self, sql: &str, label: &str) -> ViewResult<Vec<Row>>;

    /// Quote a string value for literal embedding in SQL.
    fn quote(&self, value: &str) -> String;

    /// Quote an identifier (view/table name) in the backend's style.
    fn quote_identifier(&self, name: &str) -> String;

    /// Name of the database the connection is currently attached to.
    fn current_database(&self) -> ViewResult<String>;
}
