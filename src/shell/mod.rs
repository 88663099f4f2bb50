use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

mod executor;
pub mod expand;
pub mod pipeline;
pub mod tokenizer;

pub use executor::{CommandHandler, Interpreter};

use crate::core::commands::Outcome;
use crate::core::config::{ConfigLoader, ConfigPaths};
use crate::error::ShellError;
use crate::flags::Flags;
use crate::path::logical_cwd;
use crate::process::signal;

pub struct Shell {
    pub(crate) editor: DefaultEditor,
    pub(crate) interpreter: Interpreter,
    pub(crate) flags: Flags,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let editor = DefaultEditor::new()?;
        let quiet = flags.is_set("quiet");

        signal::install_reaper()?;
        // The foreground child gets the terminal's SIGINT; the shell only notes it.
        ctrlc::set_handler(move || {
            if !quiet {
                eprintln!();
                eprintln!("vena: interrupted");
            }
        })?;

        Ok(Shell {
            editor,
            interpreter: Interpreter::new(quiet),
            flags,
        })
    }

    /// Runs the rc file and then the interactive loop. Returns the status the
    /// process should exit with.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        if let Some(status) = self.source_rc()? {
            return Ok(status);
        }

        loop {
            self.report_finished_jobs();

            let prompt = format!("{} > ", self.prompt_dir());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    match self.interpreter.execute_line(&line) {
                        Ok(Outcome::Continue) => {}
                        Ok(Outcome::Exit(status)) => return Ok(status),
                        Err(e) => eprintln!("vena: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    if !self.quiet() {
                        eprintln!("^C (type 'exit' to leave)");
                    }
                }
                Err(ReadlineError::Eof) => {
                    if !self.quiet() {
                        eprintln!("exit");
                    }
                    return Ok(0);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn source_rc(&mut self) -> Result<Option<i32>, ShellError> {
        let Some(paths) = ConfigPaths::from_flags(&self.flags) else {
            return Ok(None);
        };
        let lines = ConfigLoader::new(&paths).load_lines()?;
        tracing::debug!(path = %paths.rc_path.display(), lines = lines.len(), "sourcing rc file");

        for line in lines {
            match self.interpreter.run_line(&line) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Exit(status)) => return Ok(Some(status)),
                Err(e) => eprintln!("vena: {}: {}", paths.rc_path.display(), e),
            }
        }
        Ok(None)
    }

    // A reap pass before every prompt covers signals that arrived while a
    // foreground wait kept the sweep disabled.
    fn report_finished_jobs(&self) {
        signal::reap_children();
        for (pid, state) in signal::drain_finished() {
            if !self.quiet() {
                eprintln!("[{}] {}", pid, state);
            }
        }
    }

    fn prompt_dir(&self) -> String {
        logical_cwd()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|_| "?".to_string())
    }

    fn quiet(&self) -> bool {
        self.flags.is_set("quiet")
    }
}
