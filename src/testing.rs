//! Test doubles for the connection seam.
//!
//! `MockConnection` plays the live database's part in unit tests: catalog
//! queries are scripted as (substring pattern -> rows) stubs, every
//! executed statement is logged, and statements can be scripted to fail
//! with a canned backend diagnostic. Unstubbed statements succeed with no
//! rows, which is what DDL returns anyway.

use std::cell::RefCell;

use crate::connection::{Connection, Row};
use crate::error::{ViewError, ViewResult};

enum QuoteStyle {
    /// Postgres and SQLite: double-quoted identifiers
    DoubleQuote,
    /// MySQL: backticked identifiers
    Backtick,
}

struct Stub {
    pattern: String,
    result: ViewResult<Vec<Row>>,
}

pub struct MockConnection {
    database: String,
    quote_style: QuoteStyle,
    executed: RefCell<Vec<String>>,
    stubs: RefCell<Vec<Stub>>,
}

impl MockConnection {
    pub fn postgres(database: &str) -> Self {
        Self::new(database, QuoteStyle::DoubleQuote)
    }

    pub fn mysql(database: &str) -> Self {
        Self::new(database, QuoteStyle::Backtick)
    }

    pub fn sqlite(database: &str) -> Self {
        Self::new(database, QuoteStyle::DoubleQuote)
    }

    fn new(database: &str, quote_style: QuoteStyle) -> Self {
        MockConnection {
            database: database.to_string(),
            quote_style,
            executed: RefCell::new(Vec::new()),
            stubs: RefCell::new(Vec::new()),
        }
    }

    /// Script rows for any statement containing `pattern`. Earlier stubs
    /// win, so register the most specific pattern first when they overlap.
    pub fn stub(&self, pattern: &str, rows: Vec<Row>) {
        self.stubs.borrow_mut().push(Stub { pattern: pattern.to_string(), result: Ok(rows) });
    }

    /// Script a backend failure for any statement containing `pattern`.
    pub fn stub_error(&self, pattern: &str, message: &str) {
        self.stubs.borrow_mut().push(Stub {
            pattern: pattern.to_string(),
            result: Err(ViewError::Execution {
                sql: String::new(),
                message: message.to_string(),
            }),
        });
    }

    /// Every statement executed, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    /// Executed statements containing `pattern`.
    pub fn executed_matching(&self, pattern: &str) -> Vec<String> {
        self.executed
            .borrow()
            .iter()
            .filter(|sql| sql.contains(pattern))
            .cloned()
            .collect()
    }
}

impl Connection for MockConnection {
    fn execute(&self, sql: &str, _label: &str) -> ViewResult<Vec<Row>> {
        self.executed.borrow_mut().push(sql.to_string());

        for stub in self.stubs.borrow().iter() {
            if sql.contains(&stub.pattern) {
                return match &stub.result {
                    Ok(rows) => Ok(rows.clone()),
                    Err(ViewError::Execution { message, .. }) => Err(ViewError::Execution {
                        sql: sql.to_string(),
                        message: message.clone(),
                    }),
                    Err(other) => Err(other.clone()),
                };
            }
        }

        Ok(Vec::new())
    }

    fn quote(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    fn quote_identifier(&self, name: &str) -> String {
        match self.quote_style {
            QuoteStyle::DoubleQuote => format!("\"{}\"", name.replace('"', "\"\"")),
            QuoteStyle::Backtick => format!("`{}`", name.replace('`', "``")),
        }
    }

    fn current_database(&self) -> ViewResult<String> {
        Ok(self.database.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstubbed_statements_succeed_empty() {
        let conn = MockConnection::postgres("appdb");
        let rows = conn.execute("CREATE VIEW x AS SELECT 1", "create view").unwrap();

        assert!(rows.is_empty());
        assert_eq!(conn.executed().len(), 1);
    }

    #[test]
    fn test_stub_error_carries_attempted_sql() {
        let conn = MockConnection::postgres("appdb");
        conn.stub_error("CREATE VIEW", "permission denied");

        let err = conn.execute("CREATE VIEW x AS SELECT 1", "create view").unwrap_err();
        match err {
            ViewError::Execution { sql, message } => {
                assert_eq!(sql, "CREATE VIEW x AS SELECT 1");
                assert_eq!(message, "permission denied");
            }
            other => panic!("expected Execution, got {other:?}"),
        }
    }

    #[test]
    fn test_quote_styles() {
        let pg = MockConnection::postgres("appdb");
        assert_eq!(pg.quote("o'brien"), "'o''brien'");
        assert_eq!(pg.quote_identifier("a_ones"), "\"a_ones\"");

        let my = MockConnection::mysql("appdb");
        assert_eq!(my.quote_identifier("a_ones"), "`a_ones`");
    }
}
