use std::io::Write;

mod builtin;
mod cd;
mod echo;
mod env;
mod exit;
mod export;
mod help;
mod history;
mod pwd;
mod type_cmd;

pub use builtin::Builtin;
pub use cd::CdCommand;
pub use echo::EchoCommand;
pub use env::EnvCommand;
pub use exit::ExitCommand;
pub use export::{ExportCommand, UnsetCommand};
pub use help::HelpCommand;
pub use history::HistoryCommand;
pub use pwd::PwdCommand;
pub use type_cmd::TypeCommand;

use crate::core::env::EnvError;
use crate::core::session::ShellSession;
use crate::error::describe_io;

#[derive(Debug)]
pub enum CommandError {
    InvalidArguments(String),
    ExecutionError(String),
    IoError(std::io::Error),
    EnvError(EnvError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidArguments(msg) => write!(f, "{}", msg),
            CommandError::ExecutionError(msg) => write!(f, "{}", msg),
            CommandError::IoError(err) => write!(f, "{}", describe_io(err)),
            CommandError::EnvError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

impl From<EnvError> for CommandError {
    fn from(err: EnvError) -> Self {
        CommandError::EnvError(err)
    }
}

/// What the interactive loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit(i32),
}

/// Everything a builtin may touch: the session and the two output streams,
/// which the caller may have substituted for a redirection target.
pub struct Context<'a> {
    pub session: &'a mut ShellSession,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

pub trait Command {
    /// `args[0]` is the name the builtin was invoked as.
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError>;
}
