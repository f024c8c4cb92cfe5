use crate::catalog::ViewKind;
use crate::connection::Connection;
use crate::ddl::ViewOps;
use crate::error::ViewResult;
use crate::hooks::{OperationContext, OperationKind, OperationResult};

impl ViewOps {
    /// Names of the non-system views in the current schema/search path.
    pub fn views(&self, conn: &dyn Connection) -> ViewResult<Vec<String>> {
        let mut ctx = OperationContext::new(OperationKind::ListViews, "");

        self.hooks().run(&mut ctx, |ctx| {
            ctx.result = OperationResult::Names(self.adapter().views(conn)?);
            Ok(())
        })?;

        match ctx.result {
            OperationResult::Names(names) => Ok(names),
            _ => Ok(Vec::new()),
        }
    }

    /// Definition text and kind of the named view.
    ///
    /// A missing view is `Ok(None)`, never an error: callers distinguish
    /// "no such view" from a failed catalog query.
    pub fn view_full_definition(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        query_name: Option<&str>,
    ) -> ViewResult<Option<(String, ViewKind)>> {
        let mut ctx = OperationContext::new(OperationKind::ViewDefinition, view_name)
            .with_query_name(query_name);

        self.hooks().run(&mut ctx, |ctx| {
            let query_name = ctx.query_name.clone();
            if let Some((definition, kind)) =
                self.adapter()
                    .view_full_definition(conn, &ctx.view_name, query_name.as_deref())?
            {
                ctx.definition = Some(definition.clone());
                ctx.result = OperationResult::Definition { definition, kind };
            }
            Ok(())
        })?;

        match ctx.result {
            OperationResult::Definition { definition, kind } => Ok(Some((definition, kind))),
            _ => Ok(None),
        }
    }

    /// The SQL that would follow `CREATE VIEW <name> AS`.
    pub fn view_definition(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        query_name: Option<&str>,
    ) -> ViewResult<Option<String>> {
        Ok(self
            .view_full_definition(conn, view_name, query_name)?
            .map(|(definition, _)| definition))
    }

    /// Whether the named view is ordinary or materialized.
    pub fn view_type(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        query_name: Option<&str>,
    ) -> ViewResult<Option<ViewKind>> {
        Ok(self
            .view_full_definition(conn, view_name, query_name)?
            .map(|(_, kind)| kind))
    }
}
