//! MySQL-like dialect. No materialized views; `CREATE OR REPLACE VIEW` is
//! supported. Introspection reads `information_schema.views` scoped to the
//! current schema, restores the `CHECK OPTION` clause the catalog splits
//! off, and strips explicit current-database qualification so dumps stay
//! portable across database names.

use tracing::debug;

use crate::catalog::ViewKind;
use crate::dialect::DialectAdapter;
use crate::connection::Connection;
use crate::ddl::ViewOptions;
use crate::error::{ViewError, ViewResult};
use crate::parser;

#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    pub fn new() -> Self {
        MysqlDialect
    }
}

impl DialectAdapter for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn create_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        definition: &str,
        options: ViewOptions,
    ) -> ViewResult<()> {
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
        let sql = "SELECT table_name FROM information_schema.views \
                   WHERE table_schema = SCHEMA()";

        let rows = conn.execute(sql, "views")?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("table_name"))
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
            "SELECT view_definition, check_option FROM information_schema.views \
             WHERE table_schema = SCHEMA() AND table_name = {}",
            conn.quote(view_name)
        );

        let rows = conn.execute(&sql, query_name.unwrap_or("view definition"))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let raw = row.get("view_definition").ok_or_else(|| ViewError::Catalog {
            operation: format!("view definition for '{view_name}'"),
            message: "information_schema returned no view_definition column".to_string(),
        })?;

        // The stored definition scopes tables to the database it was
        // created in; a dump must not be bound to that name.
        let quoted_database = conn.quote_identifier(&conn.current_database()?);
        let mut definition = parser::strip_database_qualification(raw, &quoted_database);

        match row.get("check_option") {
            Some("CASCADED") => definition.push_str(" WITH CASCADED CHECK OPTION"),
            Some("LOCAL") => definition.push_str(" WITH LOCAL CHECK OPTION"),
            _ => {}
        }

        Ok(Some((parser::normalize_definition(&definition), ViewKind::Ordinary)))
    }
}
