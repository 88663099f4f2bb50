mod paths;
mod vars;

pub use paths::{find_executable, DEFAULT_PATH};
pub use vars::VarTable;

#[derive(Debug)]
pub enum EnvError {
    HomeDirNotFound,
    VarNotFound(String),
    InvalidName(String),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::HomeDirNotFound => write!(f, "HOME not set"),
            EnvError::VarNotFound(var) => write!(f, "{}: not found", var),
            EnvError::InvalidName(name) => write!(f, "'{}': not a valid identifier", name),
        }
    }
}

impl std::error::Error for EnvError {}
