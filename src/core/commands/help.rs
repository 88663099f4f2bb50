use super::{Builtin, Command, CommandError, Context, Outcome};
use std::io::Write;

#[derive(Clone)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let Some(topic) = args.get(1) else {
            writeln!(ctx.stdout, "vena builtins:")?;
            for builtin in Builtin::all() {
                writeln!(ctx.stdout, "  {:<26} {}", builtin.usage(), builtin.summary())?;
            }
            return Ok(Outcome::Continue);
        };

        let builtin = Builtin::lookup(topic).ok_or_else(|| {
            CommandError::InvalidArguments(format!("no help topics match '{}'", topic))
        })?;
        writeln!(ctx.stdout, "{}: {}", builtin.name(), builtin.usage())?;
        writeln!(ctx.stdout, "    {}", builtin.summary())?;
        Ok(Outcome::Continue)
    }
}
