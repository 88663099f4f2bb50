use super::EnvError;
use crate::shell::expand::is_identifier;
use std::collections::BTreeMap;
use std::env;

/// A shell variable. Exported variables are mirrored into the process
/// environment so that children inherit them at fork time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub value: Box<str>,
    pub exported: bool,
}

/// The session's variable table, kept separately from the environment so
/// that shell-local assignments stay invisible to children until exported.
#[derive(Clone, Debug, Default)]
pub struct VarTable {
    vars: BTreeMap<Box<str>, Variable>,
}

impl VarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a shell-local variable. An already exported variable stays
    /// exported and its environment value is updated too.
    pub fn set_local(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        validate(name)?;
        let exported = self.vars.get(name).is_some_and(|v| v.exported);
        if exported {
            env::set_var(name, value);
        }
        self.vars.insert(
            name.into(),
            Variable {
                value: value.into(),
                exported,
            },
        );
        Ok(())
    }

    /// `export NAME=value`.
    pub fn export(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        validate(name)?;
        env::set_var(name, value);
        self.vars.insert(
            name.into(),
            Variable {
                value: value.into(),
                exported: true,
            },
        );
        Ok(())
    }

    /// `export NAME`: publishes a variable the session already knows.
    pub fn export_existing(&mut self, name: &str) -> Result<(), EnvError> {
        validate(name)?;
        let var = self
            .vars
            .get_mut(name)
            .ok_or_else(|| EnvError::VarNotFound(name.to_string()))?;
        env::set_var(name, &*var.value);
        var.exported = true;
        Ok(())
    }

    /// Removes `name` from the table and the environment. Absent names are
    /// not an error.
    pub fn unset(&mut self, name: &str) -> Result<(), EnvError> {
        validate(name)?;
        self.vars.remove(name);
        env::remove_var(name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|v| &*v.value)
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.vars.get(name).is_some_and(|v| v.exported)
    }
}

// `env::set_var` panics on names containing `=` or NUL; identifiers never do.
fn validate(name: &str) -> Result<(), EnvError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(EnvError::InvalidName(name.to_string()))
    }
}
