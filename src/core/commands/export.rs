use super::{Command, CommandError, Context, Outcome};
use std::env;
use std::io::Write;

#[derive(Clone)]
pub struct ExportCommand;

impl ExportCommand {
    fn list(&self, ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let mut vars: Vec<(String, String)> = env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect();
        vars.sort();
        for (name, value) in vars {
            writeln!(ctx.stdout, "export {}=\"{}\"", name, value)?;
        }
        Ok(Outcome::Continue)
    }
}

impl Command for ExportCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let operands = args.get(1..).unwrap_or_default();
        if operands.is_empty() {
            return self.list(ctx);
        }

        for arg in operands {
            match arg.split_once('=') {
                Some((name, value)) => ctx.session.vars_mut().export(name, value)?,
                None => ctx.session.vars_mut().export_existing(arg)?,
            }
        }
        Ok(Outcome::Continue)
    }
}

#[derive(Clone)]
pub struct UnsetCommand;

impl Command for UnsetCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        for name in args.get(1..).unwrap_or_default() {
            ctx.session.vars_mut().unset(name)?;
        }
        Ok(Outcome::Continue)
    }
}
