//! Command log for reversible migrations.
//!
//! Records create/drop-view calls as replayable commands and computes the
//! inverse sequence for rollback. Only the operation and its arguments are
//! retained: a drop does not remember the definition it destroyed, which
//! is why it cannot be inverted.

use serde::{Deserialize, Serialize};

use crate::ddl::ViewOptions;
use crate::error::{ViewError, ViewResult};

/// One recorded view operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MigrationCommand {
    CreateView {
        view_name: String,
        definition: String,
        options: ViewOptions,
    },
    DropView {
        view_name: String,
        options: ViewOptions,
    },
}

impl MigrationCommand {
    /// The command that undoes this one.
    ///
    /// A create inverts to a drop, carrying the materialized flag so the
    /// right kind of view is dropped. A drop has no inverse.
    pub fn invert(&self) -> ViewResult<MigrationCommand> {
        match self {
            MigrationCommand::CreateView { view_name, options, .. } => {
                let options = if options.materialized {
                    ViewOptions { materialized: true, ..ViewOptions::default() }
                } else {
                    ViewOptions::default()
                };
                Ok(MigrationCommand::DropView { view_name: view_name.clone(), options })
            }
            MigrationCommand::DropView { view_name, .. } => {
                Err(ViewError::IrreversibleMigration {
                    command: format!("drop_view {view_name}"),
                })
            }
        }
    }
}

/// Ordered log of the view operations a migration performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecorder {
    commands: Vec<MigrationCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, command: MigrationCommand) {
        self.commands.push(command);
    }

    pub fn create_view(&mut self, view_name: &str, definition: &str, options: ViewOptions) {
        self.record(MigrationCommand::CreateView {
            view_name: view_name.to_string(),
            definition: definition.to_string(),
            options,
        });
    }

    pub fn drop_view(&mut self, view_name: &str, options: ViewOptions) {
        self.record(MigrationCommand::DropView {
            view_name: view_name.to_string(),
            options,
        });
    }

    pub fn commands(&self) -> &[MigrationCommand] {
        &self.commands
    }

    /// The rollback sequence: every command inverted, in reverse order.
    /// Fails on the first command with no inverse.
    pub fn inverse(&self) -> ViewResult<Vec<MigrationCommand>> {
        self.commands.iter().rev().map(MigrationCommand::invert).collect()
    }
}
