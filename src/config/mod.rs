/// Maximum reference-chain depth allowed when ordering schema objects
/// Prevents runaway hierarchies and is cheap to check during the sort
pub const MAX_DEPENDENCY_DEPTH: usize = 10;

/// Views whose name starts with this prefix are Postgres-internal
pub const POSTGRES_SYSTEM_VIEW_PREFIX: &str = "pg_";

/// Extension-provided views that live in user schemas but are not user views
pub const POSTGRES_EXTENSION_VIEWS: &[&str] = &[
    "geography_columns",
    "geometry_columns",
    "raster_columns",
    "raster_overviews",
];

/// Views whose name starts with this prefix are SQLite-internal
pub const SQLITE_SYSTEM_VIEW_PREFIX: &str = "sqlite_";

/// Prefix for the per-view heredoc delimiter in dump output
pub const DUMP_HEREDOC_PREFIX: &str = "END_VIEW_";
