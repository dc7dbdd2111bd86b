//! Unix process management using process groups
//!
//! Spawned children are made leaders of a fresh process group via
//! `setpgid(0, 0)` before `exec`, so a single negative-PID signal reaches
//! the whole tree.
//!
//! ## Delivery rules
//!
//! - Group delivery (`foreground=false`) signals `-pid`. Unless the signal
//!   is `SIGKILL` or `SIGCONT`, a companion `SIGCONT` follows: a child that
//!   has been `SIGSTOP`'d holds the termination signal pending and would
//!   otherwise never act on it, leaving the whole lifecycle stuck.
//! - Foreground delivery signals the child PID only, leaving the child free
//!   to manage its own descendants.
//! - `ESRCH`/`EPERM` mean the target already exited; both are swallowed.

// Process-group setup requires a raw libc call between fork and exec.
#![allow(unsafe_code)]

use std::io;

use nix::errno::Errno;
use nix::sys::signal::{self, killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;
use tracing::debug;

/// Attach the spawn attributes the supervisor relies on.
///
/// The child becomes the leader of a new process group. Foreground mode
/// changes nothing at spawn time on Unix; it only narrows signal delivery.
pub fn configure_command(cmd: &mut Command, _foreground: bool) {
    // SAFETY: setpgid(0, 0) is async-signal-safe and runs in the child
    // between fork and exec.
    unsafe {
        cmd.pre_exec(|| {
            if libc::setpgid(0, 0) == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

/// Deliver the termination signal to the child.
///
/// Group delivery includes the `SIGCONT` companion send described in the
/// module docs so a stopped child can observe the request.
pub fn terminate(pid: i32, sig: Signal, foreground: bool) -> io::Result<()> {
    if foreground {
        debug!("Sending {:?} to process {}", sig, pid);
        return send(|| signal::kill(Pid::from_raw(pid), sig));
    }

    let pgid = Pid::from_raw(pid);
    debug!("Sending {:?} to process group {}", sig, pid);
    send(|| killpg(pgid, sig))?;
    if sig != Signal::SIGKILL && sig != Signal::SIGCONT {
        send(|| killpg(pgid, Signal::SIGCONT))?;
    }
    Ok(())
}

/// Force-terminate the whole child tree with `SIGKILL`.
pub fn killall(pid: i32) -> io::Result<()> {
    debug!("Sending SIGKILL to process group {}", pid);
    send(|| killpg(Pid::from_raw(pid), Signal::SIGKILL))
}

/// Force-kill the direct child PID only.
pub fn kill_direct(pid: i32) -> io::Result<()> {
    debug!("Sending SIGKILL to process {}", pid);
    send(|| signal::kill(Pid::from_raw(pid), Signal::SIGKILL))
}

fn send(op: impl FnOnce() -> nix::Result<()>) -> io::Result<()> {
    match op() {
        Ok(()) => Ok(()),
        // The target group or process already exited.
        Err(Errno::ESRCH) | Err(Errno::EPERM) => Ok(()),
        Err(errno) => Err(io::Error::from_raw_os_error(errno as i32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exited_targets_are_swallowed() {
        assert!(send(|| Err(Errno::ESRCH)).is_ok());
        assert!(send(|| Err(Errno::EPERM)).is_ok());
        let err = send(|| Err(Errno::EINVAL)).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(Errno::EINVAL as i32));
    }
}
