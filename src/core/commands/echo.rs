use super::{Command, CommandError, Context, Outcome};
use crate::shell::expand::expand_vars;
use std::io::Write;

#[derive(Clone)]
pub struct EchoCommand;

impl Command for EchoCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let mut words = args.get(1..).unwrap_or_default();
        let newline = match words.first() {
            Some(flag) if flag == "-n" => {
                words = &words[1..];
                false
            }
            _ => true,
        };

        let session = &*ctx.session;
        let line = words
            .iter()
            .map(|word| expand_vars(word, |name| session.lookup(name)))
            .collect::<Vec<_>>()
            .join(" ");

        write!(ctx.stdout, "{}", line)?;
        if newline {
            writeln!(ctx.stdout)?;
        }
        Ok(Outcome::Continue)
    }
}
