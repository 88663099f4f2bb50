use super::{Command, CommandError, Context, Outcome};
use std::io::Write;

#[derive(Clone)]
pub struct EnvCommand;

impl Command for EnvCommand {
    fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let mut vars: Vec<_> = std::env::vars_os().collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in vars {
            writeln!(
                ctx.stdout,
                "{}={}",
                name.to_string_lossy(),
                value.to_string_lossy()
            )?;
        }
        Ok(Outcome::Continue)
    }
}
