use tracing::info;

use crate::connection::Connection;
use crate::ddl::{QuerySource, ViewOps, ViewOptions};
use crate::error::{ViewError, ViewResult};
use crate::hooks::{OperationContext, OperationKind};
use crate::validation::validate_identifier;

impl ViewOps {
    /// Create a view from its SQL definition.
    ///
    /// `force` first drops any existing view of the same name (and kind);
    /// `allow_replace` uses the backend's atomic create-or-replace form
    /// instead. Without either, creating over an existing view surfaces
    /// the backend's own duplicate-object error.
    ///
    /// Steps:
    /// 1. Run the create-view interceptor chain (may rewrite inputs)
    /// 2. Reject option combinations the backend cannot satisfy
    /// 3. Drop the existing view when `force` is set
    /// 4. Execute the backend's CREATE statement
    pub fn create_view<Q: QuerySource + ?Sized>(
        &self,
        conn: &dyn Connection,
        view_name: &str,
        definition: &Q,
        options: ViewOptions,
    ) -> ViewResult<()> {
        let mut ctx = OperationContext::new(OperationKind::CreateView, view_name)
            .with_definition(&definition.to_sql())
            .with_options(options);

        self.hooks().run(&mut ctx, |ctx| {
            let view_name = ctx.view_name.clone();
            let definition = ctx.definition.clone().unwrap_or_default();
            let options = ctx.options;

            validate_identifier(&view_name, "view_name")?;

            if options.materialized && !self.adapter().supports_materialized_views() {
                return Err(ViewError::UnsupportedFeature {
                    feature: "Materialized views".to_string(),
                    backend: self.adapter().name(),
                });
            }

            if options.materialized
                && options.allow_replace
                && !self.adapter().supports_replace_of_materialized()
            {
                return Err(ViewError::InvalidOptions {
                    reason: format!(
                        "allow_replace cannot be combined with materialized on {}",
                        self.adapter().name()
                    ),
                });
            }

            if options.force {
                self.drop_view(
                    conn,
                    &view_name,
                    ViewOptions {
                        if_exists: true,
                        materialized: options.materialized,
                        ..ViewOptions::default()
                    },
                )?;
            }

            self.adapter().create_view(conn, &view_name, &definition, options)?;
            info!(view = %view_name, materialized = options.materialized, "view created");
            Ok(())
        })
    }
}
