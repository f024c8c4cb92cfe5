//! Interceptor pipeline wrapped around every view operation.
//!
//! Each operation kind has its own ordered chain of interceptors. An
//! interceptor may run logic before the underlying action, after it, or
//! both, and may mutate the shared per-call [`OperationContext`] (view
//! name, definition, options, result). The terminal stage is the dialect
//! adapter call itself.
//!
//! Invocation is synchronous and strictly follows registration order; a
//! `before` error cancels the call before the terminal stage runs. No
//! context is shared across calls.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::ViewKind;
use crate::ddl::ViewOptions;
use crate::error::ViewResult;

/// The operation a context belongs to; each kind has its own chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateView,
    DropView,
    RefreshView,
    ViewDefinition,
    ListViews,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationKind::CreateView => "create view",
            OperationKind::DropView => "drop view",
            OperationKind::RefreshView => "refresh view",
            OperationKind::ViewDefinition => "describe view",
            OperationKind::ListViews => "list views",
        };
        write!(f, "{name}")
    }
}

/// Result slot of a context; interceptors may rewrite it in `after`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationResult {
    #[default]
    None,
    Definition {
        definition: String,
        kind: ViewKind,
    },
    Names(Vec<String>),
}

/// Mutable state threaded through one operation call.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub kind: OperationKind,
    pub view_name: String,
    pub definition: Option<String>,
    pub options: ViewOptions,
    /// Caller-supplied label forwarded to `Connection::execute`
    pub query_name: Option<String>,
    pub result: OperationResult,
}

impl OperationContext {
    pub fn new(kind: OperationKind, view_name: &str) -> Self {
        OperationContext {
            kind,
            view_name: view_name.to_string(),
            definition: None,
            options: ViewOptions::default(),
            query_name: None,
            result: OperationResult::None,
        }
    }

    pub fn with_definition(mut self, definition: &str) -> Self {
        self.definition = Some(definition.to_string());
        self
    }

    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_query_name(mut self, query_name: Option<&str>) -> Self {
        self.query_name = query_name.map(str::to_string);
        self
    }
}

/// One stage in a pipeline. Both methods default to pass-through; an `Err`
/// from `before` cancels the operation.
pub trait Interceptor: Send + Sync {
    fn before(&self, _ctx: &mut OperationContext) -> ViewResult<()> {
        Ok(())
    }

    fn after(&self, _ctx: &mut OperationContext) -> ViewResult<()> {
        Ok(())
    }
}

/// Per-operation-kind interceptor chains, built once at setup and injected
/// into the facade.
#[derive(Default)]
pub struct HookRegistry {
    chains: HashMap<OperationKind, Vec<Arc<dyn Interceptor>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor to the chain for `kind`. Chains run in
    /// registration order.
    pub fn register(&mut self, kind: OperationKind, interceptor: Arc<dyn Interceptor>) {
        self.chains.entry(kind).or_default().push(interceptor);
    }

    pub fn is_empty(&self) -> bool {
        self.chains.values().all(Vec::is_empty)
    }

    /// Drive one operation: befores in order, the terminal action, afters
    /// in order. Any error aborts the remaining stages.
    pub fn run<F>(&self, ctx: &mut OperationContext, terminal: F) -> ViewResult<()>
    where
        F: FnOnce(&mut OperationContext) -> ViewResult<()>,
    {
        let chain = self.chains.get(&ctx.kind);

        if let Some(chain) = chain {
            for interceptor in chain {
                interceptor.before(ctx)?;
            }
        }

        terminal(ctx)?;

        if let Some(chain) = chain {
            for interceptor in chain {
                interceptor.after(ctx)?;
            }
        }

        Ok(())
    }
}
