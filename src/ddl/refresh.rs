use tracing::info;

use crate::connection::Connection;
use crate::ddl::{ViewOps, ViewOptions};
use crate::error::{ViewError, ViewResult};
use crate::hooks::{OperationContext, OperationKind};
use crate::validation::validate_identifier;

impl ViewOps {
    /// Re-run a materialized view's stored query, replacing its persisted
    /// contents. Structure and dependent indexes are untouched. Only valid
    /// for materialized views on backends that have them.
    pub fn refresh_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        options: ViewOptions,
    ) -> ViewResult<()> {
        let mut ctx = OperationContext::new(OperationKind::RefreshView, view_name)
            .with_options(options);

        self.hooks().run(&mut ctx, |ctx| {
            let view_name = ctx.view_name.clone();

            validate_identifier(&view_name, "view_name")?;

            if !self.adapter().supports_materialized_views() {
                return Err(ViewError::UnsupportedFeature {
                    feature: "Materialized views".to_string(),
                    backend: self.adapter().name(),
                });
            }

            self.adapter().refresh_view(conn, &view_name)?;
            info!(view = %view_name, "materialized view refreshed");
            Ok(())
        })
    }
}
