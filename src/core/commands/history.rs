use super::{Command, CommandError, Context, Outcome};
use std::io::Write;

#[derive(Clone)]
pub struct HistoryCommand;

impl Command for HistoryCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome, CommandError> {
        let entries = ctx.session.history();
        let skip = match args.get(1) {
            None => 0,
            Some(count) => {
                let count = count.parse::<usize>().map_err(|_| {
                    CommandError::InvalidArguments(format!(
                        "{}: numeric argument required",
                        count
                    ))
                })?;
                entries.len().saturating_sub(count)
            }
        };

        for (idx, line) in entries.iter().enumerate().skip(skip) {
            writeln!(ctx.stdout, "{:>5}  {}", idx + 1, line)?;
        }
        Ok(Outcome::Continue)
    }
}
