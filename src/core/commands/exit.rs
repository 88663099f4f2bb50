use super::{Command, CommandError, Context, Outcome};
use std::io::Write;

/// Status used when `exit` is given something that is not a number.
const USAGE_STATUS: i32 = 2;

#[derive(Clone)]
pub struct ExitCommand;

impl Command for ExitCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        match args.get(1..).unwrap_or_default() {
            [] => Ok(Outcome::Exit(0)),
            [status] => match status.parse::<i32>() {
                Ok(code) => Ok(Outcome::Exit(code)),
                Err(_) => {
                    writeln!(ctx.stderr, "exit: {}: numeric argument required", status)?;
                    Ok(Outcome::Exit(USAGE_STATUS))
                }
            },
            _ => Err(CommandError::InvalidArguments("too many arguments".to_string())),
        }
    }
}
