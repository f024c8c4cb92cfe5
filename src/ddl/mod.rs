//! View operations facade.
//!
//! Backend-agnostic entry points for creating, dropping, refreshing and
//! introspecting views. Each operation validates its inputs, applies
//! option defaults, runs through the hook pipeline, and delegates to the
//! active dialect adapter. Backend execution failures propagate unchanged:
//! DDL failures are not transient and are never retried here.

pub mod create;
pub mod drop;
pub mod introspect;
pub mod refresh;

use serde::{Deserialize, Serialize};

use crate::dialect::DialectAdapter;
use crate::hooks::HookRegistry;

/// A view definition source: raw SQL text, or a query builder that renders
/// itself to SQL.
pub trait QuerySource {
    fn to_sql(&self) -> String;
}

impl QuerySource for str {
    fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl QuerySource for String {
    fn to_sql(&self) -> String {
        self.clone()
    }
}

/// Options recognized by the create/drop operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Drop an existing view of the same name before creating
    #[serde(default)]
    pub force: bool,
    /// Use the backend's atomic create-or-replace form instead of
    /// drop-then-create
    #[serde(default)]
    pub allow_replace: bool,
    /// Target a materialized view instead of an ordinary one
    #[serde(default)]
    pub materialized: bool,
    /// Drop only: suppress the not-found error
    #[serde(default)]
    pub if_exists: bool,
}

impl ViewOptions {
    pub fn with_force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn with_allow_replace(mut self) -> Self {
        self.allow_replace = true;
        self
    }

    pub fn with_materialized(mut self) -> Self {
        self.materialized = true;
        self
    }

    pub fn with_if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

/// The facade itself: one dialect adapter plus the registered interceptor
/// chains, both injected at construction. Holds no connection; every call
/// takes the connection it should run against.
pub struct ViewOps {
    adapter: Box<dyn DialectAdapter>,
    hooks: HookRegistry,
}

impl ViewOps {
    pub fn new(adapter: Box<dyn DialectAdapter>) -> Self {
        Self::with_hooks(adapter, HookRegistry::new())
    }

    pub fn with_hooks(adapter: Box<dyn DialectAdapter>, hooks: HookRegistry) -> Self {
        ViewOps { adapter, hooks }
    }

    pub fn adapter(&self) -> &dyn DialectAdapter {
        self.adapter.as_ref()
    }

    pub(crate) fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }
}
