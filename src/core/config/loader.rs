use std::fs;
use std::io::ErrorKind;

use super::{ConfigError, ConfigPaths};

pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    /// Reads the rc file and returns the lines worth interpreting: blank
    /// lines and `#` comments are dropped. A missing default file yields
    /// nothing; a missing explicit one is an error.
    pub fn load_lines(&self) -> Result<Vec<String>, ConfigError> {
        let path = &self.paths.rc_path;
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.paths.explicit {
                    return Err(ConfigError::ConfigFileNotFound(path.clone()));
                }
                return Ok(Vec::new());
            }
            Err(e) => return Err(ConfigError::IoError(path.clone(), e)),
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}
