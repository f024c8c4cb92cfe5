//! First-class SQL VIEW and MATERIALIZED VIEW support for a migration-driven
//! access layer.
//!
//! One [`dialect::DialectAdapter`] per backend normalizes the SQL and
//! catalog differences between Postgres-like, MySQL-like and SQLite-like
//! databases into a single contract; the [`ddl::ViewOps`] facade wraps
//! every operation in an interceptor pipeline; the [`dump`] module emits a
//! replayable schema description with views placed after everything they
//! reference; and the [`recorder`] module records create/drop calls for
//! reversible migration replay.
//!
//! The surrounding framework supplies the live [`connection::Connection`]
//! and the dump collaborators; this crate never holds a connection of its
//! own and persists nothing.

pub mod catalog;
pub mod config;
pub mod connection;
pub mod ddl;
pub mod dependency;
pub mod dialect;
pub mod dump;
pub mod error;
pub mod hooks;
pub mod parser;
pub mod recorder;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{IndexDescriptor, ViewDescriptor, ViewKind};
pub use connection::{Connection, Row};
pub use ddl::{QuerySource, ViewOps, ViewOptions};
pub use dialect::{DialectAdapter, MysqlDialect, PostgresDialect, SqliteDialect};
pub use dump::{SchemaDump, SchemaDumper};
pub use error::{ViewError, ViewResult};
pub use hooks::{HookRegistry, Interceptor, OperationContext, OperationKind, OperationResult};
pub use recorder::{CommandRecorder, MigrationCommand};

/// Crate version, as reported to diagnostics
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
