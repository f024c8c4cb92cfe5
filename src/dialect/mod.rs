//! Per-backend dialect adapters.
//!
//! A [`DialectAdapter`] translates the uniform view operations into one
//! backend's SQL and parses that backend's catalog results back into the
//! uniform model. One adapter is selected at connection-setup time and
//! injected into the facade; everything above this trait is
//! backend-agnostic.

pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::catalog::ViewKind;
use crate::connection::Connection;
use crate::ddl::ViewOptions;
use crate::error::ViewResult;

/// Backend-specific SQL generation and catalog introspection.
///
/// Adapters only build and run SQL; option gating (unsupported features,
/// conflicting options, force pre-drops) happens in the facade before an
/// adapter is reached.
pub trait DialectAdapter: Send + Sync {
    /// Short backend name used in error messages and logs
    fn name(&self) -> &'static str;

    fn supports_materialized_views(&self) -> bool {
        false
    }

    /// Whether `CREATE OR REPLACE` can target a materialized view
    fn supports_replace_of_materialized(&self) -> bool {
        false
    }

    /// Execute the backend's `CREATE ... VIEW` statement.
    fn create_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        definition: &str,
        options: ViewOptions,
    ) -> ViewResult<()>;

    /// Execute the backend's `DROP ... VIEW` statement.
    fn drop_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        options: ViewOptions,
    ) -> ViewResult<()>;

    /// Re-run a materialized view's stored query, replacing its contents.
    fn refresh_view(&self, conn: &dyn Connection, view_name: &str) -> ViewResult<()>;

    /// Names of the non-system views visible in the current schema or
    /// search path. Never crosses into other schemas.
    fn views(&self, conn: &dyn Connection) -> ViewResult<Vec<String>>;

    /// Definition text and kind of the named view; `None` when the view
    /// does not exist.
    fn view_full_definition(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        query_name: Option<&str>,
    ) -> ViewResult<Option<(String, ViewKind)>>;
}
