//! SQLite-like dialect. No materialized views. The catalog stores the
//! whole `CREATE VIEW` statement, so introspection reads `sqlite_master`
//! and pattern-strips the statement prefix to recover the query body.

use tracing::debug;

use crate::catalog::ViewKind;
use crate::dialect::DialectAdapter;
use crate::config::SQLITE_SYSTEM_VIEW_PREFIX;
use crate::connection::Connection;
use crate::ddl::ViewOptions;
use crate::error::{ViewError, ViewResult};
use crate::parser;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    pub fn new() -> Self {
        SqliteDialect
    }
}

impl DialectAdapter for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn create_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        definition: &str,
        options: ViewOptions,
    ) -> ViewResult<()> {
        // SQLite has no OR REPLACE form; the statement is sent anyway and
        // the backend's own syntax error propagates.
        let command = if options.allow_replace {
            "CREATE OR REPLACE VIEW"
        } else {
            "CREATE VIEW"
        };

        let sql = format!("{command} {} AS {definition}", conn.quote_identifier(view_name));
        debug!(backend = self.name(), %sql, "creating view");
        conn.execute(&sql, "create view").map(|_| ())
    }

    fn drop_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        options: ViewOptions,
    ) -> ViewResult<()> {
        let mut sql = String::from("DROP VIEW");
        if options.if_exists {
            sql.push_str(" IF EXISTS");
        }
        sql.push(' ');
        sql.push_str(&conn.quote_identifier(view_name));

        debug!(backend = self.name(), %sql, "dropping view");
        conn.execute(&sql, "drop view").map(|_| ())
    }

    fn refresh_view(&self, _conn: &dyn Connection, _view_name: &str) -> ViewResult<()> {
        Err(ViewError::UnsupportedFeature {
            feature: "Materialized views".to_string(),
            backend: self.name(),
        })
    }

    fn views(&self, conn: &dyn Connection) -> ViewResult<Vec<String>> {
        let sql = "SELECT name FROM sqlite_master WHERE type = 'view'";

        let rows = conn.execute(sql, "views")?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("name"))
            .filter(|name| !name.starts_with(SQLITE_SYSTEM_VIEW_PREFIX))
            .map(str::to_string)
            .collect())
    }

    fn view_full_definition(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        query_name: Option<&str>,
    ) -> ViewResult<Option<(String, ViewKind)>> {
        let sql = format!(
            "SELECT sql FROM sqlite_master WHERE type = 'view' AND name = {}",
            conn.quote(view_name)
        );

        let rows = conn.execute(&sql, query_name.unwrap_or("view definition"))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let stored = row.get("sql").ok_or_else(|| ViewError::Catalog {
            operation: format!("view definition for '{view_name}'"),
            message: "sqlite_master returned no sql column".to_string(),
        })?;

        let definition = parser::strip_create_view_prefix(stored);
        Ok(Some((parser::normalize_definition(&definition), ViewKind::Ordinary)))
    }
}
