use std::sync::{Mutex, MutexGuard};

use crate::core::commands::{Builtin, CommandError, Context, Outcome};
use crate::core::session::ShellSession;

static PROCESS_STATE: Mutex<()> = Mutex::new(());

/// Serializes tests that touch the working directory or the environment.
pub(crate) fn lock_process_state() -> MutexGuard<'static, ()> {
    PROCESS_STATE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Output of a builtin run against in-memory streams.
pub(crate) struct Captured {
    pub result: Result<Outcome, CommandError>,
    pub stdout: String,
    pub stderr: String,
}

pub(crate) fn run_builtin(session: &mut ShellSession, args: &[&str]) -> Captured {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let builtin = Builtin::lookup(&args[0]).expect("not a builtin");
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = {
        let mut ctx = Context {
            session,
            stdout: &mut stdout,
            stderr: &mut stderr,
        };
        builtin.run(&args, &mut ctx)
    };
    Captured {
        result,
        stdout: String::from_utf8(stdout).expect("stdout is not UTF-8"),
        stderr: String::from_utf8(stderr).expect("stderr is not UTF-8"),
    }
}
