//! SIGCHLD reaping for background jobs.
//!
//! The handler runs in signal context, so everything it touches is a fixed
//! table of atomics: no allocation, no locks, no output. The interactive loop
//! reads finished entries back out at its own pace.

use std::io;
use std::ptr;
use std::sync::atomic::{AtomicI32, AtomicU8, AtomicUsize, Ordering};

use libc::pid_t;

use super::{ChildState, ProcessError};

const MAX_JOBS: usize = 64;

const FREE: u8 = 0;
const CLAIMED: u8 = 1;
const RUNNING: u8 = 2;
const FINISHING: u8 = 3;
const DONE: u8 = 4;

// Marks a job whose status was collected elsewhere.
const NO_STATUS: i32 = i32::MIN;

struct JobSlot {
    state: AtomicU8,
    pid: AtomicI32,
    status: AtomicI32,
}

impl JobSlot {
    const fn new() -> Self {
        Self {
            state: AtomicU8::new(FREE),
            pid: AtomicI32::new(0),
            status: AtomicI32::new(0),
        }
    }

    fn finish(&self, status: i32) {
        if self
            .state
            .compare_exchange(RUNNING, FINISHING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.status.store(status, Ordering::Release);
            self.state.store(DONE, Ordering::Release);
        }
    }
}

static JOBS: [JobSlot; MAX_JOBS] = [const { JobSlot::new() }; MAX_JOBS];

// Number of foreground waits in progress. While non-zero the handler must not
// sweep with `waitpid(-1)`, or it could steal a status a foreground wait needs.
static FOREGROUND: AtomicUsize = AtomicUsize::new(0);

/// Registers the SIGCHLD handler. Call once at startup.
pub fn install_reaper() -> Result<(), ProcessError> {
    // SAFETY: `reap_children` only performs async-signal-safe work.
    unsafe { signal_hook::low_level::register(signal_hook::consts::SIGCHLD, reap_children) }
        .map(|_| ())
        .map_err(|e| ProcessError::SignalError(e.to_string()))
}

/// Collects every exited child without blocking. Safe to call both from the
/// signal handler and from the interactive loop.
pub fn reap_children() {
    for slot in JOBS.iter() {
        if slot.state.load(Ordering::Acquire) != RUNNING {
            continue;
        }
        let pid = slot.pid.load(Ordering::Acquire);
        let mut status = 0;
        // SAFETY: plain syscall on a pid we forked.
        let rc = unsafe { libc::waitpid(pid, &mut status, libc::WNOHANG) };
        if rc == pid {
            slot.finish(status);
        } else if rc < 0 && last_errno() == libc::ECHILD {
            settle_vanished(slot, pid);
        }
    }

    if FOREGROUND.load(Ordering::Acquire) > 0 {
        return;
    }

    loop {
        let mut status = 0;
        // SAFETY: as above; WNOHANG never blocks.
        let pid = unsafe { libc::waitpid(-1, &mut status, libc::WNOHANG) };
        if pid <= 0 {
            break;
        }
        // Foreground children are never swept, so anything found here is a
        // background job, possibly one not yet registered.
        match tracked_slot(pid) {
            Some(slot) => slot.finish(status),
            None => record_finished(pid, status),
        }
    }
}

/// Starts tracking a background child. Returns false when the table is full;
/// the child is then still reaped, just not reported.
pub fn track_background(pid: pid_t) -> bool {
    if finished_slot(pid).is_some() {
        return true;
    }
    for slot in JOBS.iter() {
        if slot
            .state
            .compare_exchange(FREE, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            slot.pid.store(pid, Ordering::Release);
            slot.state.store(RUNNING, Ordering::Release);
            return true;
        }
    }
    false
}

/// Takes every finished background job out of the table.
pub fn drain_finished() -> Vec<(pid_t, ChildState)> {
    let mut finished = Vec::new();
    for slot in JOBS.iter() {
        if slot.state.load(Ordering::Acquire) != DONE {
            continue;
        }
        let pid = slot.pid.load(Ordering::Acquire);
        let status = slot.status.load(Ordering::Acquire);
        slot.state.store(FREE, Ordering::Release);

        let state = if status == NO_STATUS {
            ChildState::Reaped
        } else {
            ChildState::from_raw(status)
        };
        finished.push((pid, state));
    }
    finished
}

/// Held for the duration of a foreground wait.
pub struct ForegroundGuard(());

impl ForegroundGuard {
    pub fn enter() -> Self {
        FOREGROUND.fetch_add(1, Ordering::AcqRel);
        ForegroundGuard(())
    }
}

impl Drop for ForegroundGuard {
    fn drop(&mut self) {
        FOREGROUND.fetch_sub(1, Ordering::AcqRel);
    }
}

fn tracked_slot(pid: pid_t) -> Option<&'static JobSlot> {
    JOBS.iter().find(|slot| {
        slot.state.load(Ordering::Acquire) == RUNNING && slot.pid.load(Ordering::Acquire) == pid
    })
}

// `pid` is gone but `slot` has no status for it. Either another pass recorded
// it (possibly in this very slot) or nobody did.
fn settle_vanished(slot: &'static JobSlot, pid: pid_t) {
    match finished_slot(pid) {
        Some(other) if !ptr::eq(other, slot) => slot.state.store(FREE, Ordering::Release),
        Some(_) => {}
        None => slot.finish(NO_STATUS),
    }
}

fn finished_slot(pid: pid_t) -> Option<&'static JobSlot> {
    JOBS.iter().find(|slot| {
        slot.state.load(Ordering::Acquire) == DONE && slot.pid.load(Ordering::Acquire) == pid
    })
}

fn record_finished(pid: pid_t, status: i32) {
    for slot in JOBS.iter() {
        if slot
            .state
            .compare_exchange(FREE, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            slot.pid.store(pid, Ordering::Release);
            slot.status.store(status, Ordering::Release);
            slot.state.store(DONE, Ordering::Release);
            return;
        }
    }
}

fn last_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}
