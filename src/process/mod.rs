use std::fmt;

use crate::error::describe_io;

pub mod launcher;
pub mod pipe;
pub mod redirect;
pub mod signal;

pub use launcher::ProcessLauncher;

#[derive(Debug)]
pub enum ProcessError {
    Fork(std::io::Error),
    Pipe(std::io::Error),
    Wait(std::io::Error),
    Redirect {
        path: String,
        source: std::io::Error,
    },
    EmptyCommand,
    InvalidArgument(String),
    SignalError(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "fork failed: {}", describe_io(e)),
            ProcessError::Pipe(e) => write!(f, "pipe failed: {}", describe_io(e)),
            ProcessError::Wait(e) => write!(f, "wait failed: {}", describe_io(e)),
            ProcessError::Redirect { path, source } => {
                write!(f, "{}: {}", path, describe_io(source))
            }
            ProcessError::EmptyCommand => write!(f, "empty command"),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            ProcessError::SignalError(msg) => write!(f, "signal setup failed: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

/// A child process as seen from the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Running,
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
    /// The child is gone but its status was collected by someone else.
    Reaped,
}

impl ChildState {
    /// Decodes a raw `waitpid` status.
    pub fn from_raw(status: libc::c_int) -> Self {
        if libc::WIFEXITED(status) {
            ChildState::Exited(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            ChildState::Signaled(libc::WTERMSIG(status))
        } else if libc::WIFSTOPPED(status) {
            ChildState::Stopped(libc::WSTOPSIG(status))
        } else {
            ChildState::Running
        }
    }
}

impl fmt::Display for ChildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildState::Running => write!(f, "Running"),
            ChildState::Exited(0) | ChildState::Reaped => write!(f, "Done"),
            ChildState::Exited(code) => write!(f, "Exit {}", code),
            ChildState::Signaled(sig) => write!(f, "Terminated (signal {})", sig),
            ChildState::Stopped(sig) => write!(f, "Stopped (signal {})", sig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_exit_status() {
        // Exit codes live in the second byte of the raw status.
        assert_eq!(ChildState::from_raw(0), ChildState::Exited(0));
        assert_eq!(ChildState::from_raw(3 << 8), ChildState::Exited(3));
    }

    #[test]
    fn test_decode_signal_status() {
        assert_eq!(
            ChildState::from_raw(libc::SIGKILL),
            ChildState::Signaled(libc::SIGKILL)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ChildState::Exited(0).to_string(), "Done");
        assert_eq!(ChildState::Exited(2).to_string(), "Exit 2");
        assert_eq!(ChildState::Reaped.to_string(), "Done");
    }
}
