use super::{Command, CommandError, Context, Outcome};
use crate::path::logical_cwd;
use std::env;
use std::io::Write;

#[derive(Clone)]
pub struct PwdCommand;

impl Command for PwdCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let dir = match args.get(1).map(String::as_str) {
            None | Some("-L") => logical_cwd()?,
            // getcwd already reports the path with symlinks resolved.
            Some("-P") => env::current_dir()?,
            Some(other) => {
                return Err(CommandError::InvalidArguments(format!(
                    "{}: invalid option\nusage: pwd [-P]",
                    other
                )))
            }
        };
        writeln!(ctx.stdout, "{}", dir.display())?;
        Ok(Outcome::Continue)
    }
}
