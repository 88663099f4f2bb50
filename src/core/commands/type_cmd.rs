use super::{Builtin, Command, CommandError, Context, Outcome};
use crate::core::env::find_executable;
use std::io::Write;

#[derive(Clone)]
pub struct TypeCommand;

impl Command for TypeCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        for name in args.get(1..).unwrap_or_default() {
            if Builtin::lookup(name).is_some() {
                writeln!(ctx.stdout, "{} is a shell builtin", name)?;
            } else if let Some(path) = find_executable(name) {
                writeln!(ctx.stdout, "{} is {}", name, path.display())?;
            } else {
                writeln!(ctx.stderr, "type: {}: not found", name)?;
            }
        }
        Ok(Outcome::Continue)
    }
}
