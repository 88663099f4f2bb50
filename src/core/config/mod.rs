use std::fmt;
use std::path::PathBuf;

mod loader;
mod paths;

pub use loader::ConfigLoader;
pub use paths::ConfigPaths;

#[derive(Debug)]
pub enum ConfigError {
    ConfigFileNotFound(PathBuf),
    IoError(PathBuf, std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFileNotFound(path) => {
                write!(f, "{}: config file not found", path.display())
            }
            ConfigError::IoError(path, e) => {
                write!(f, "{}: {}", path.display(), crate::error::describe_io(e))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
