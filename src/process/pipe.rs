use std::io;
use std::os::unix::io::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use tracing::debug;

use super::launcher::{wait_for, ChildIo, ProcessLauncher};
use super::redirect::OpenedRedirections;
use super::signal::ForegroundGuard;
use super::{ChildState, ProcessError};
use crate::shell::pipeline::Stage;

/// Both ends of an anonymous pipe, close-on-exec.
struct Pipe {
    read: OwnedFd,
    write: OwnedFd,
}

impl Pipe {
    fn new() -> Result<Self, ProcessError> {
        let mut fds = [0 as RawFd; 2];
        // SAFETY: `fds` has room for the two descriptors pipe(2) writes.
        if unsafe { libc::pipe(fds.as_mut_ptr()) } < 0 {
            return Err(ProcessError::Pipe(io::Error::last_os_error()));
        }
        // SAFETY: both descriptors are freshly created and owned by nobody else.
        let (read, write) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
        set_cloexec(&read)?;
        set_cloexec(&write)?;
        Ok(Self { read, write })
    }
}

fn set_cloexec(fd: &OwnedFd) -> Result<(), ProcessError> {
    // SAFETY: fcntl on a descriptor we own.
    let rc = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) };
    if rc < 0 {
        return Err(ProcessError::Pipe(io::Error::last_os_error()));
    }
    Ok(())
}

/// Runs `left | right` in the foreground and returns the state of the right
/// side. Both stages are exec'd, even when they name a builtin.
pub fn run_pipeline(
    launcher: &ProcessLauncher,
    left: &Stage,
    right: &Stage,
) -> Result<ChildState, ProcessError> {
    let left_files = OpenedRedirections::open(&left.redirects)?;
    let right_files = OpenedRedirections::open(&right.redirects)?;
    let Pipe { read, write } = Pipe::new()?;

    let _guard = ForegroundGuard::enter();

    let left_io = ChildIo {
        pipe_out: Some(write.as_raw_fd()),
        extra_close: vec![read.as_raw_fd()],
        ..ChildIo::with_files(&left_files)
    };
    let left_pid = launcher.spawn(&left.args, &left_io);
    // The right side only sees EOF once every write end is gone.
    drop(write);
    drop(left_files);
    let left_pid = left_pid?;

    let right_io = ChildIo {
        pipe_in: Some(read.as_raw_fd()),
        ..ChildIo::with_files(&right_files)
    };
    let right_pid = launcher.spawn(&right.args, &right_io);
    drop(read);
    drop(right_files);

    let right_pid = match right_pid {
        Ok(pid) => pid,
        Err(err) => {
            // Nobody reads the pipe now, so the left side ends on SIGPIPE or EOF.
            let _ = wait_for(left_pid);
            return Err(err);
        }
    };

    let left_state = wait_for(left_pid);
    let right_state = wait_for(right_pid)?;
    debug!(left_pid, right_pid, left = ?left_state, right = %right_state, "pipeline finished");
    left_state?;
    Ok(right_state)
}
