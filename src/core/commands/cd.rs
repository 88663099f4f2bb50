use super::{Command, CommandError, Context, Outcome};
use crate::error::describe_io;
use crate::path::{lexical_join, logical_cwd, same_file, PathExpander};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self {
            path_expander: PathExpander::new(),
        }
    }

    // Resolves the operand to a target and the text used in diagnostics.
    fn target(&self, operand: Option<&str>, ctx: &Context<'_>) -> Result<(PathBuf, String), CommandError> {
        match operand {
            None => {
                let home = self.path_expander.get_home_dir()?;
                let shown = home.display().to_string();
                Ok((home, shown))
            }
            Some("-") => {
                let previous = ctx
                    .session
                    .previous_dir()
                    .ok_or_else(|| CommandError::ExecutionError("OLDPWD not set".to_string()))?;
                Ok((previous.to_path_buf(), previous.display().to_string()))
            }
            Some(dir) => Ok((self.path_expander.expand(dir)?, dir.to_string())),
        }
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let operands = args.get(1..).unwrap_or_default();
        if operands.len() > 1 {
            return Err(CommandError::InvalidArguments("too many arguments".to_string()));
        }

        let operand = operands.first().map(String::as_str);
        let (target, shown) = self.target(operand, ctx)?;
        let current = current_dir_for_oldpwd();

        env::set_current_dir(&target).map_err(|e| {
            CommandError::ExecutionError(format!("{}: {}", shown, describe_io(&e)))
        })?;

        // Past this point the directory has changed; nothing below may fail
        // before the session records it.
        let new_dir = resolve_logical(current.as_deref(), &target);
        if let Some(current) = current {
            env::set_var("OLDPWD", &current);
            ctx.session.set_previous_dir(current);
        }
        env::set_var("PWD", &new_dir);
        tracing::debug!(dir = %new_dir.display(), "changed directory");

        if operand == Some("-") {
            writeln!(ctx.stdout, "{}", new_dir.display())?;
        }
        Ok(Outcome::Continue)
    }
}

// The directory being left. When it has been removed `getcwd` fails, but
// `$PWD` still names it.
fn current_dir_for_oldpwd() -> Option<PathBuf> {
    logical_cwd().ok().or_else(|| {
        env::var_os("PWD")
            .map(PathBuf::from)
            .filter(|pwd| pwd.is_absolute())
    })
}

// Prefer the path as typed (symlinks kept); fall back to the physical
// directory when the lexical form does not lead to where we are, and to the
// target itself when even that is unavailable.
fn resolve_logical(previous: Option<&Path>, target: &Path) -> PathBuf {
    let candidate = match previous {
        Some(base) => Some(lexical_join(base, target)),
        None if target.is_absolute() => Some(lexical_join(Path::new("/"), target)),
        None => None,
    };
    match candidate {
        Some(candidate) if same_file(&candidate, Path::new(".")) => candidate,
        _ => env::current_dir().unwrap_or_else(|_| target.to_path_buf()),
    }
}
