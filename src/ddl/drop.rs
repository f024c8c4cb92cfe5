use tracing::info;

use crate::connection::Connection;
use crate::ddl::{ViewOps, ViewOptions};
use crate::error::{ViewError, ViewResult};
use crate::hooks::{OperationContext, OperationKind};
use crate::validation::validate_identifier;

impl ViewOps {
    /// Drop the named view. With `if_exists`, a missing view is not an
    /// error; without it, the backend's not-found error propagates.
    pub fn drop_view(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        options: ViewOptions,
    ) -> ViewResult<()> {
        let mut ctx = OperationContext::new(OperationKind::DropView, view_name)
            .with_options(options);

        self.hooks().run(&mut ctx, |ctx| {
            let view_name = ctx.view_name.clone();
            let options = ctx.options;

            validate_identifier(&view_name, "view_name")?;

            if options.materialized && !self.adapter().supports_materialized_views() {
                return Err(ViewError::UnsupportedFeature {
                    feature: "Materialized views".to_string(),
                    backend: self.adapter().name(),
                });
            }

            self.adapter().drop_view(conn, &view_name, options)?;
            info!(view = %view_name, "view dropped");
            Ok(())
        })
    }
}
