use std::fmt;

#[cfg(test)]
pub mod testing;

/// Main error type for schema_views operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Operation needs a capability the active backend does not have
    /// (materialized views on MySQL/SQLite, refresh of ordinary views)
    UnsupportedFeature {
        feature: String,
        backend: &'static str,
    },

    /// Conflicting option combination, rejected before any SQL is issued
    InvalidOptions {
        reason: String,
    },

    /// View name failed whitelist validation
    InvalidIdentifier {
        name: String,
        reason: String,
    },

    /// The backend rejected a statement; carries the attempted SQL plus the
    /// native diagnostic text, unchanged
    Execution {
        sql: String,
        message: String,
    },

    /// A catalog/introspection query returned something unusable
    Catalog {
        operation: String,
        message: String,
    },

    /// Dependency cycle detected while ordering schema objects
    CircularDependency {
        cycle: Vec<String>,
    },

    /// Reference chain deeper than the configured maximum
    DependencyDepthExceeded {
        depth: usize,
        max_depth: usize,
    },

    /// Migration replay tried to invert an operation with no inverse
    IrreversibleMigration {
        command: String,
    },
}

impl ViewError {
    /// SQLSTATE code for this error
    pub fn sqlstate(&self) -> &'static str {
        use ViewError::*;
        match self {
            UnsupportedFeature { .. } => "0A000",        // Feature not supported
            InvalidOptions { .. } => "22023",            // Invalid parameter value
            InvalidIdentifier { .. } => "42602",         // Invalid name
            Execution { .. } => "XX000",                 // Backend diagnostic carried verbatim
            Catalog { .. } => "XX000",
            CircularDependency { .. } => "55P03",        // Lock not available (cycle)
            DependencyDepthExceeded { .. } => "54001",   // Statement too complex
            IrreversibleMigration { .. } => "55000",     // Object not in prerequisite state
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ViewError::*;
        match self {
            UnsupportedFeature { feature, backend } => {
                write!(f, "{feature} are not implemented or supported on {backend}")
            }
            InvalidOptions { reason } => {
                write!(f, "Invalid option combination: {reason}")
            }
            InvalidIdentifier { name, reason } => {
                write!(f, "Invalid identifier '{name}': {reason}")
            }
            Execution { sql, message } => {
                write!(f, "Statement failed: {message}\nSQL: {}",
                       if sql.len() > 200 { &sql[..200] } else { sql })
            }
            Catalog { operation, message } => {
                write!(f, "Catalog operation '{operation}' failed: {message}")
            }
            CircularDependency { cycle } => {
                write!(f, "Circular dependency detected: {}", cycle.join(" -> "))
            }
            DependencyDepthExceeded { depth, max_depth } => {
                write!(f, "Dependency depth {depth} exceeds maximum {max_depth}")
            }
            IrreversibleMigration { command } => {
                write!(f, "Operation '{command}' cannot be reversed: the original view definition is not retained")
            }
        }
    }
}

impl std::error::Error for ViewError {}

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;
