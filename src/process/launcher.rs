use std::ffi::CString;
use std::io::{self, Write};
use std::os::raw::c_char;
use std::os::unix::ffi::OsStringExt;
use std::os::unix::io::RawFd;
use std::ptr;

use libc::pid_t;
use tracing::{debug, warn};

use super::redirect::OpenedRedirections;
use super::signal::{self, ForegroundGuard};
use super::{ChildState, ProcessError};
use crate::core::env::find_executable;
use crate::shell::pipeline::Redirections;

const EXIT_NOT_FOUND: i32 = 1;
const EXIT_CANNOT_EXECUTE: i32 = 126;

/// Descriptors a child wires up before exec. File redirections are applied
/// after pipe ends, so a file always wins over a pipe on the same stream.
#[derive(Debug, Default)]
pub struct ChildIo {
    pub pipe_in: Option<RawFd>,
    pub pipe_out: Option<RawFd>,
    pub file_in: Option<RawFd>,
    pub file_out: Option<RawFd>,
    /// Descriptors the child must not keep, e.g. the unused end of a pipe.
    pub extra_close: Vec<RawFd>,
}

impl ChildIo {
    pub fn with_files(files: &OpenedRedirections) -> Self {
        Self {
            file_in: files.input_fd(),
            file_out: files.output_fd(),
            ..Self::default()
        }
    }

    fn originals(&self) -> Vec<RawFd> {
        [self.pipe_in, self.pipe_out, self.file_in, self.file_out]
            .into_iter()
            .flatten()
            .chain(self.extra_close.iter().copied())
            .filter(|&fd| fd > libc::STDERR_FILENO)
            .collect()
    }
}

/// Everything the child needs, built before `fork` so the child never
/// allocates.
struct ExecPlan {
    path: Option<CString>,
    argv: Vec<CString>,
    not_found: Vec<u8>,
    cannot_execute: Vec<u8>,
}

impl ExecPlan {
    fn prepare(args: &[String]) -> Result<Self, ProcessError> {
        let program = args.first().ok_or(ProcessError::EmptyCommand)?;
        let argv = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes())
                    .map_err(|_| ProcessError::InvalidArgument(arg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let path = match find_executable(program) {
            Some(path) => Some(
                CString::new(path.into_os_string().into_vec())
                    .map_err(|_| ProcessError::InvalidArgument(program.clone()))?,
            ),
            None => None,
        };

        Ok(Self {
            path,
            argv,
            not_found: format!("{}: command not found\n", program).into_bytes(),
            cannot_execute: format!("{}: cannot execute\n", program).into_bytes(),
        })
    }
}

/// Runs external commands with fork/exec.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    quiet: bool,
}

impl ProcessLauncher {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Launches one command. Foreground runs return the child's final state;
    /// background runs return `None` as soon as the child is forked.
    pub fn run(
        &self,
        args: &[String],
        redirects: &Redirections,
        background: bool,
    ) -> Result<Option<ChildState>, ProcessError> {
        let files = OpenedRedirections::open(redirects)?;
        let io = ChildIo::with_files(&files);

        // Entered before fork so the reaper can never collect this child.
        let guard = (!background).then(ForegroundGuard::enter);
        let pid = self.spawn(args, &io)?;
        drop(files);

        if background {
            if !signal::track_background(pid) {
                warn!(pid, "job table full; completion will not be reported");
            }
            if !self.quiet {
                eprintln!("[{}]", pid);
            }
            return Ok(None);
        }

        let state = wait_for(pid)?;
        drop(guard);
        debug!(pid, %state, "foreground command finished");
        Ok(Some(state))
    }

    /// Forks a child that execs `args` with `io` applied. The caller owns the
    /// descriptors in `io` and must close its copies afterwards.
    pub fn spawn(&self, args: &[String], io: &ChildIo) -> Result<pid_t, ProcessError> {
        let plan = ExecPlan::prepare(args)?;
        let mut argv: Vec<*const c_char> = plan.argv.iter().map(|arg| arg.as_ptr()).collect();
        argv.push(ptr::null());
        let close = io.originals();

        // Buffered output would otherwise be written twice.
        let _ = io::stdout().flush();

        // SAFETY: the child branch only calls async-signal-safe functions on
        // memory prepared above and never returns.
        match unsafe { libc::fork() } {
            -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
            0 => unsafe { exec_child(&plan, &argv, io, &close) },
            pid => {
                debug!(pid, program = %args[0], "spawned child");
                Ok(pid)
            }
        }
    }
}

/// Blocks until `pid` changes state, retrying on interrupted waits. A child
/// that was already collected elsewhere is reported as `Reaped`.
pub fn wait_for(pid: pid_t) -> Result<ChildState, ProcessError> {
    loop {
        let mut status = 0;
        // SAFETY: plain syscall with a valid out-pointer.
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            return Ok(ChildState::from_raw(status));
        }
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EINTR) => continue,
            Some(libc::ECHILD) => return Ok(ChildState::Reaped),
            _ => return Err(ProcessError::Wait(err)),
        }
    }
}

unsafe fn exec_child(plan: &ExecPlan, argv: &[*const c_char], io: &ChildIo, close: &[RawFd]) -> ! {
    libc::signal(libc::SIGINT, libc::SIG_DFL);
    libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    let mut empty: libc::sigset_t = std::mem::zeroed();
    libc::sigemptyset(&mut empty);
    libc::sigprocmask(libc::SIG_SETMASK, &empty, ptr::null_mut());

    let wiring = [
        (io.pipe_in, libc::STDIN_FILENO),
        (io.pipe_out, libc::STDOUT_FILENO),
        (io.file_in, libc::STDIN_FILENO),
        (io.file_out, libc::STDOUT_FILENO),
    ];
    for (source, target) in wiring {
        if let Some(fd) = source {
            if libc::dup2(fd, target) < 0 {
                fail(b"vena: cannot set up redirection\n", EXIT_NOT_FOUND);
            }
        }
    }
    for &fd in close {
        libc::close(fd);
    }

    let Some(path) = plan.path.as_deref() else {
        fail(&plan.not_found, EXIT_NOT_FOUND);
    };
    libc::execv(path.as_ptr(), argv.as_ptr());

    match io::Error::last_os_error().raw_os_error() {
        Some(libc::ENOENT) => fail(&plan.not_found, EXIT_NOT_FOUND),
        _ => fail(&plan.cannot_execute, EXIT_CANNOT_EXECUTE),
    }
}

unsafe fn fail(message: &[u8], code: i32) -> ! {
    libc::write(
        libc::STDERR_FILENO,
        message.as_ptr().cast(),
        message.len(),
    );
    libc::_exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_exit_status_is_captured() {
        let launcher = ProcessLauncher::new(true);
        let state = launcher
            .run(&args(&["sh", "-c", "exit 3"]), &Redirections::default(), false)
            .unwrap();
        assert_eq!(state, Some(ChildState::Exited(3)));
    }

    #[test]
    fn test_unknown_command_exits_with_one() {
        let launcher = ProcessLauncher::new(true);
        let state = launcher
            .run(
                &args(&["vena-no-such-command-xyz"]),
                &Redirections::default(),
                false,
            )
            .unwrap();
        assert_eq!(state, Some(ChildState::Exited(EXIT_NOT_FOUND)));
    }

    #[test]
    fn test_file_without_exec_bit_is_not_found() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("script.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();

        let launcher = ProcessLauncher::new(true);
        let state = launcher
            .run(
                &args(&[script.to_str().unwrap()]),
                &Redirections::default(),
                false,
            )
            .unwrap();
        assert_eq!(state, Some(ChildState::Exited(EXIT_NOT_FOUND)));
    }

    #[test]
    fn test_unrunnable_file_exits_with_126() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let bogus = dir.path().join("bogus");
        std::fs::write(&bogus, [0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        std::fs::set_permissions(&bogus, std::fs::Permissions::from_mode(0o755)).unwrap();

        let launcher = ProcessLauncher::new(true);
        let state = launcher
            .run(
                &args(&[bogus.to_str().unwrap()]),
                &Redirections::default(),
                false,
            )
            .unwrap();
        assert_eq!(state, Some(ChildState::Exited(EXIT_CANNOT_EXECUTE)));
    }

    #[test]
    fn test_output_and_input_redirection() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "redirected\n").unwrap();

        let launcher = ProcessLauncher::new(true);
        let redirects = Redirections {
            input: Some(input),
            output: Some(output.clone()),
        };
        let state = launcher.run(&args(&["cat"]), &redirects, false).unwrap();
        assert_eq!(state, Some(ChildState::Exited(0)));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "redirected\n");
    }

    #[test]
    fn test_missing_input_file_skips_command() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("never.txt");
        let launcher = ProcessLauncher::new(true);
        let redirects = Redirections {
            input: Some(PathBuf::from("/no/such/input.txt")),
            output: Some(output.clone()),
        };

        let err = launcher.run(&args(&["cat"]), &redirects, false).unwrap_err();
        assert!(matches!(err, ProcessError::Redirect { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_exec_diagnostics_name_the_command() {
        let plan = ExecPlan::prepare(&args(&["vena-no-such-command-xyz", "-x"])).unwrap();
        assert!(plan.path.is_none());
        assert_eq!(plan.not_found, b"vena-no-such-command-xyz: command not found\n");
        assert_eq!(plan.cannot_execute, b"vena-no-such-command-xyz: cannot execute\n");
        assert_eq!(plan.argv.len(), 2);
    }

    #[test]
    fn test_argument_with_nul_byte_is_rejected() {
        let launcher = ProcessLauncher::new(true);
        let err = launcher
            .spawn(&args(&["echo", "a\0b"]), &ChildIo::default())
            .unwrap_err();
        assert!(matches!(err, ProcessError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let launcher = ProcessLauncher::new(true);
        assert!(matches!(
            launcher.spawn(&[], &ChildIo::default()),
            Err(ProcessError::EmptyCommand)
        ));
    }
}
