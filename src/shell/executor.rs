use std::io::{self, Write};

use tracing::{debug, trace};

use super::expand::{expand_vars, is_identifier};
use super::pipeline::{Pipeline, Stage};
use super::tokenizer::tokenize;
use crate::core::commands::{Builtin, Context, Outcome};
use crate::core::session::ShellSession;
use crate::error::ShellError;
use crate::process::pipe::run_pipeline;
use crate::process::redirect::OpenedRedirections;
use crate::process::ProcessLauncher;

/// Runs input lines against one session.
pub struct Interpreter {
    session: ShellSession,
    launcher: ProcessLauncher,
    quiet: bool,
}

pub trait CommandHandler {
    /// Records `line` in history, then runs it.
    fn execute_line(&mut self, line: &str) -> Result<Outcome, ShellError>;

    /// Runs `line` without recording it.
    fn run_line(&mut self, line: &str) -> Result<Outcome, ShellError>;
}

impl Interpreter {
    pub fn new(quiet: bool) -> Self {
        Self {
            session: ShellSession::new(),
            launcher: ProcessLauncher::new(quiet),
            quiet,
        }
    }

    pub fn session(&self) -> &ShellSession {
        &self.session
    }

    fn run_pipeline(&mut self, pipeline: Pipeline) -> Result<Outcome, ShellError> {
        if let Some(right) = &pipeline.right {
            if pipeline.background && !self.quiet {
                eprintln!("vena: background pipelines are not supported; running in foreground");
            }
            let state = run_pipeline(&self.launcher, &pipeline.left, right)?;
            debug!(%state, "pipeline done");
            return Ok(Outcome::Continue);
        }

        let stage = pipeline.left;
        if let Some(builtin) = Builtin::lookup(stage.program()) {
            return self.run_builtin(builtin, &stage);
        }

        let state = self
            .launcher
            .run(&stage.args, &stage.redirects, pipeline.background)?;
        if let Some(state) = state {
            debug!(program = stage.program(), %state, "command done");
        }
        Ok(Outcome::Continue)
    }

    /// Builtins run in this process; a `>` target replaces their stdout for
    /// this one call only.
    fn run_builtin(&mut self, builtin: Builtin, stage: &Stage) -> Result<Outcome, ShellError> {
        // The input file is opened only to report a missing or unreadable one.
        let OpenedRedirections { input: _, output } = OpenedRedirections::open(&stage.redirects)?;

        let mut stdout: Box<dyn Write> = match output {
            Some(file) => Box::new(file),
            None => Box::new(io::stdout().lock()),
        };
        let mut stderr = io::stderr().lock();

        trace!(builtin = builtin.name(), "running builtin");
        let result = {
            let mut ctx = Context {
                session: &mut self.session,
                stdout: &mut *stdout,
                stderr: &mut stderr,
            };
            builtin.run(&stage.args, &mut ctx)
        };
        stdout.flush()?;

        result.map_err(|source| ShellError::Builtin {
            name: builtin.name(),
            source,
        })
    }

    // `NAME=value NAME2=value2` with nothing else sets shell-local variables.
    fn try_assign(&mut self, pipeline: &Pipeline) -> Result<bool, ShellError> {
        if pipeline.is_pipeline() || pipeline.background || !pipeline.left.redirects.is_empty() {
            return Ok(false);
        }
        let assignments: Option<Vec<(&str, &str)>> = pipeline
            .left
            .args
            .iter()
            .map(|word| {
                word.split_once('=')
                    .filter(|(name, _)| is_identifier(name))
            })
            .collect();
        let Some(assignments) = assignments else {
            return Ok(false);
        };

        for (name, value) in assignments {
            self.session
                .vars_mut()
                .set_local(name, value)
                .map_err(|e| ShellError::Builtin {
                    name: "assignment",
                    source: e.into(),
                })?;
        }
        Ok(true)
    }
}

impl CommandHandler for Interpreter {
    fn execute_line(&mut self, line: &str) -> Result<Outcome, ShellError> {
        if !line.trim().is_empty() {
            self.session.record(line);
        }
        self.run_line(line)
    }

    fn run_line(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let session = &self.session;
        let expanded = expand_vars(line, |name| session.lookup(name));
        let tokens = tokenize(&expanded)?;

        let Some(pipeline) = Pipeline::parse(tokens)? else {
            return Ok(Outcome::Continue);
        };
        debug!(?pipeline, "parsed line");

        if self.try_assign(&pipeline)? {
            return Ok(Outcome::Continue);
        }
        self.run_pipeline(pipeline)
    }
}
