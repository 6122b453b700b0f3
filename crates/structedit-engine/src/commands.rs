//! Named commands and the collection that runs them.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::model::Model;
use crate::typing::DeleteParams;

/// Parameters handed to [`Command::execute`]. A command only ever sees the
/// kinds it [accepts](Command::accepts).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandParams {
    #[default]
    None,
    Delete(DeleteParams),
    InsertImage {
        attributes: Vec<(String, String)>,
    },
}

impl CommandParams {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "no",
            Self::Delete(_) => "delete",
            Self::InsertImage { .. } => "insertImage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("there is no command named {0:?}")]
    NotFound(String),

    #[error("command {0:?} is disabled")]
    Disabled(String),

    #[error("command {command:?} does not take {params} parameters")]
    InvalidParams {
        command: String,
        params: &'static str,
    },
}

pub trait Command {
    fn is_enabled(&self, _model: &Model) -> bool {
        true
    }

    fn accepts(&self, _params: &CommandParams) -> bool {
        true
    }

    fn execute(&mut self, model: &mut Model, params: CommandParams);
}

/// Runs commands by name.
pub trait CommandExecutor {
    fn execute(
        &mut self,
        model: &mut Model,
        name: &str,
        params: CommandParams,
    ) -> Result<(), CommandError>;
}

#[derive(Default)]
pub struct Commands {
    commands: HashMap<String, Box<dyn Command>>,
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.commands.keys().collect();
        names.sort();
        f.debug_struct("Commands").field("names", &names).finish()
    }
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `command` under `name`, replacing any previous one.
    pub fn add(&mut self, name: &str, command: impl Command + 'static) {
        self.commands.insert(name.to_string(), Box::new(command));
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// `false` for unknown commands.
    pub fn is_enabled(&self, model: &Model, name: &str) -> bool {
        self.commands
            .get(name)
            .is_some_and(|command| command.is_enabled(model))
    }
}

impl CommandExecutor for Commands {
    fn execute(
        &mut self,
        model: &mut Model,
        name: &str,
        params: CommandParams,
    ) -> Result<(), CommandError> {
        let command = self
            .commands
            .get_mut(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;
        if !command.accepts(&params) {
            return Err(CommandError::InvalidParams {
                command: name.to_string(),
                params: params.kind(),
            });
        }
        if !command.is_enabled(model) {
            return Err(CommandError::Disabled(name.to_string()));
        }
        command.execute(model, params);
        Ok(())
    }
}
