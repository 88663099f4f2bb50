use crate::core::commands::CommandError;
use crate::core::config::ConfigError;
use crate::process::ProcessError;
use crate::shell::pipeline::LineError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    Parse(LineError),
    Builtin {
        name: &'static str,
        source: CommandError,
    },
    ProcessError(ProcessError),
    ConfigError(ConfigError),
    FlagError(String),
    CtrlC(String),
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<ctrlc::Error> for ShellError {
    fn from(err: ctrlc::Error) -> Self {
        ShellError::CtrlC(err.to_string())
    }
}

impl From<LineError> for ShellError {
    fn from(err: LineError) -> Self {
        ShellError::Parse(err)
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::ProcessError(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::ConfigError(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "input error: {}", e),
            ShellError::Io(e) => write!(f, "{}", describe_io(e)),
            ShellError::Parse(e) => write!(f, "{}", e),
            ShellError::Builtin { name, source } => write!(f, "{}: {}", name, source),
            ShellError::ProcessError(e) => write!(f, "{}", e),
            ShellError::ConfigError(e) => write!(f, "config error: {}", e),
            ShellError::FlagError(msg) => write!(f, "{}", msg),
            ShellError::CtrlC(msg) => write!(f, "Ctrl-C handler error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {}

/// Renders an I/O error the way shells report them: `No such file or
/// directory` rather than `No such file or directory (os error 2)`.
pub(crate) fn describe_io(err: &std::io::Error) -> String {
    let text = err.to_string();
    match text.find(" (os error") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}
