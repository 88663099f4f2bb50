use super::{
    CdCommand, Command, CommandError, Context, EchoCommand, EnvCommand, ExitCommand,
    ExportCommand, HelpCommand, HistoryCommand, Outcome, PwdCommand, TypeCommand, UnsetCommand,
};

/// The closed set of commands that run inside the shell process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
    Pwd,
    Echo,
    Export,
    Unset,
    Env,
    History,
    Type,
    Help,
}

const TABLE: [(&str, Builtin); 10] = [
    ("cd", Builtin::Cd),
    ("exit", Builtin::Exit),
    ("pwd", Builtin::Pwd),
    ("echo", Builtin::Echo),
    ("export", Builtin::Export),
    ("unset", Builtin::Unset),
    ("env", Builtin::Env),
    ("history", Builtin::History),
    ("type", Builtin::Type),
    ("help", Builtin::Help),
];

impl Builtin {
    /// Case-insensitive lookup. `None` means "not a builtin": the caller
    /// falls through to external execution.
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        TABLE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, builtin)| builtin)
    }

    pub fn all() -> impl Iterator<Item = Builtin> {
        TABLE.iter().map(|&(_, builtin)| builtin)
    }

    pub fn name(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, builtin)| *builtin == self)
            .map_or("", |&(name, _)| name)
    }

    pub fn usage(self) -> &'static str {
        match self {
            Builtin::Cd => "cd [dir | -]",
            Builtin::Exit => "exit [n]",
            Builtin::Pwd => "pwd [-P]",
            Builtin::Echo => "echo [-n] [arg ...]",
            Builtin::Export => "export [name[=value] ...]",
            Builtin::Unset => "unset name ...",
            Builtin::Env => "env",
            Builtin::History => "history [n]",
            Builtin::Type => "type name ...",
            Builtin::Help => "help [builtin]",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Builtin::Cd => "Change the working directory; `-` returns to the previous one.",
            Builtin::Exit => "Leave the shell with status n (default 0).",
            Builtin::Pwd => "Print the working directory; -P resolves symbolic links.",
            Builtin::Echo => "Print arguments separated by spaces; -n omits the newline.",
            Builtin::Export => "Set environment variables, or export shell variables.",
            Builtin::Unset => "Remove variables from the shell and the environment.",
            Builtin::Env => "List environment variables sorted by name.",
            Builtin::History => "List the lines entered this session, optionally the last n.",
            Builtin::Type => "Tell whether a name is a builtin or where it is on PATH.",
            Builtin::Help => "List builtins, or show usage for one.",
        }
    }

    pub fn run(self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        match self {
            Builtin::Cd => CdCommand::new().execute(args, ctx),
            Builtin::Exit => ExitCommand.execute(args, ctx),
            Builtin::Pwd => PwdCommand.execute(args, ctx),
            Builtin::Echo => EchoCommand.execute(args, ctx),
            Builtin::Export => ExportCommand.execute(args, ctx),
            Builtin::Unset => UnsetCommand.execute(args, ctx),
            Builtin::Env => EnvCommand.execute(args, ctx),
            Builtin::History => HistoryCommand.execute(args, ctx),
            Builtin::Type => TypeCommand.execute(args, ctx),
            Builtin::Help => HelpCommand.execute(args, ctx),
        }
    }
}
