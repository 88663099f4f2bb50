use crate::core::env::EnvError;
use std::env;
use std::os::unix::fs::MetadataExt;
use std::path::{Component, Path, PathBuf};

#[derive(Clone)]
pub struct PathExpander;

impl Default for PathExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PathExpander {
    pub fn new() -> Self {
        Self
    }

    /// Expands a leading `~` or `~/`. `~user` forms are left untouched.
    pub fn expand(&self, path: &str) -> Result<PathBuf, EnvError> {
        match path.strip_prefix('~') {
            Some("") => self.get_home_dir(),
            Some(rest) if rest.starts_with('/') => {
                let mut home = self.get_home_dir()?;
                home.extend(rest.split('/').filter(|part| !part.is_empty()));
                Ok(home)
            }
            _ => Ok(PathBuf::from(path)),
        }
    }

    pub fn get_home_dir(&self) -> Result<PathBuf, EnvError> {
        env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(EnvError::HomeDirNotFound)
    }
}

/// The working directory as the user navigated to it: `$PWD` when it still
/// names the current directory, otherwise the physical path.
pub fn logical_cwd() -> std::io::Result<PathBuf> {
    if let Some(pwd) = env::var_os("PWD").map(PathBuf::from) {
        if pwd.is_absolute() && same_file(&pwd, Path::new(".")) {
            return Ok(pwd);
        }
    }
    env::current_dir()
}

/// Joins `target` onto `base` and folds `.` and `..` lexically, without
/// touching the filesystem, so symlinked directories keep their names.
pub fn lexical_join(base: &Path, target: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in base.join(target).components() {
        match component {
            Component::RootDir | Component::Prefix(_) => result.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
        }
    }
    if result.as_os_str().is_empty() {
        result.push("/");
    }
    result
}

pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.metadata(), b.metadata()) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}
