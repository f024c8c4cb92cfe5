//! Postgres-like dialect: the only supported backend with materialized
//! views. Introspection goes through `pg_class`/`pg_namespace` scoped to
//! the current search path.

use tracing::debug;

use crate::catalog::ViewKind;
use crate::dialect::DialectAdapter;
use crate::config::{POSTGRES_EXTENSION_VIEWS, POSTGRES_SYSTEM_VIEW_PREFIX};
use crate::connection::Connection;
use crate::ddl::ViewOptions;
use crate::error::{ViewError, ViewResult};
use crate::parser;

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    pub fn new() -> Self {
        PostgresDialect
    }
}

impl DialectAdapter for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn supports_materialized_views(&self) -> bool {
        true
    }

    fn create_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        definition: &str,
        options: ViewOptions,
    ) -> ViewResult<()> {
        let command = if options.materialized {
            "CREATE MATERIALIZED VIEW"
        } else if options.allow_replace {
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
        let mut sql = String::from(if options.materialized {
            "DROP MATERIALIZED VIEW"
        } else {
            "DROP VIEW"
        });
        if options.if_exists {
            sql.push_str(" IF EXISTS");
        }
        sql.push(' ');
        sql.push_str(&conn.quote_identifier(view_name));

        debug!(backend = self.name(), %sql, "dropping view");
        conn.execute(&sql, "drop view").map(|_| ())
    }

    fn refresh_view(&self, conn: &dyn Connection, view_name: &str) -> ViewResult<()> {
        // Refreshing an ordinary view is a caller mistake, not a backend
        // error; check the kind before issuing DDL.
        if let Some((_, ViewKind::Ordinary)) = self.view_full_definition(conn, view_name, None)? {
            return Err(ViewError::UnsupportedFeature {
                feature: "Refreshes of ordinary views".to_string(),
                backend: self.name(),
            });
        }

        let sql = format!("REFRESH MATERIALIZED VIEW {}", conn.quote_identifier(view_name));
        debug!(backend = self.name(), %sql, "refreshing materialized view");
        conn.execute(&sql, "refresh view").map(|_| ())
    }

    fn views(&self, conn: &dyn Connection) -> ViewResult<Vec<String>> {
        let sql = "SELECT c.relname AS viewname \
                   FROM pg_class c \
                   INNER JOIN pg_namespace n ON c.relnamespace = n.oid \
                   WHERE c.relkind IN ('v', 'm') \
                   AND n.nspname = ANY (current_schemas(false))";

        let rows = conn.execute(sql, "views")?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("viewname"))
            .filter(|name| {
                !name.starts_with(POSTGRES_SYSTEM_VIEW_PREFIX)
                    && !POSTGRES_EXTENSION_VIEWS.contains(name)
            })
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
            "SELECT pg_get_viewdef(c.oid) AS view_definition, c.relkind::text AS relkind \
             FROM pg_class c \
             INNER JOIN pg_namespace n ON c.relnamespace = n.oid \
             WHERE c.relkind IN ('v', 'm') \
             AND n.nspname = ANY (current_schemas(false)) \
             AND c.relname = {}",
            conn.quote(view_name)
        );

        let rows = conn.execute(&sql, query_name.unwrap_or("view definition"))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let definition = row.get("view_definition").ok_or_else(|| ViewError::Catalog {
            operation: format!("view definition for '{view_name}'"),
            message: "catalog returned no view_definition column".to_string(),
        })?;
        let kind = match row.get("relkind") {
            Some("m") => ViewKind::Materialized,
            _ => ViewKind::Ordinary,
        };

        Ok(Some((parser::normalize_definition(definition), kind)))
    }
}
