use std::env;
use std::path::{Path, PathBuf};

use super::env::VarTable;

/// State that lives as long as the interactive loop. Only builtins mutate
/// it; external commands run in their own process image and cannot.
#[derive(Debug, Default)]
pub struct ShellSession {
    previous_dir: Option<PathBuf>,
    vars: VarTable,
    history: Vec<String>,
}

impl ShellSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The directory `cd -` returns to. Unset until the first successful `cd`.
    pub fn previous_dir(&self) -> Option<&Path> {
        self.previous_dir.as_deref()
    }

    pub(crate) fn set_previous_dir(&mut self, dir: PathBuf) {
        self.previous_dir = Some(dir);
    }

    pub fn vars(&self) -> &VarTable {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut VarTable {
        &mut self.vars
    }

    /// Value of `name` for expansion: the environment first, then
    /// shell-local variables.
    pub fn lookup(&self, name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .or_else(|| self.vars.get(name).map(str::to_owned))
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn record(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}
