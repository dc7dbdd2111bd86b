//! Windows process management
//!
//! Process groups are simulated with the `CREATE_NEW_PROCESS_GROUP` creation
//! flag so console control events can reach the tree, and the force-kill
//! path delegates to `taskkill /F /T`, which walks the child tree for us.

use std::io;
use std::os::windows::process::CommandExt;
use std::process::Command as StdCommand;

use tokio::process::Command;
use tracing::debug;

use crate::signal::TermSignal;

const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Attach the spawn attributes the supervisor relies on.
///
/// The child starts in a new process group unless foreground mode is
/// requested.
pub fn configure_command(cmd: &mut Command, foreground: bool) {
    if !foreground {
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }
}

/// Deliver the configured termination request.
///
/// There is no signal delivery on Windows: a hard kill maps to a forced
/// `taskkill`, every other signal to the polite form against the child PID.
pub fn terminate(pid: i32, sig: TermSignal, _foreground: bool) -> io::Result<()> {
    match sig {
        TermSignal::Kill => {
            debug!("Force-terminating process {}", pid);
            taskkill(&["/F", "/PID", &pid.to_string()])
        }
        TermSignal::Interrupt => {
            debug!("Requesting termination of process {}", pid);
            taskkill(&["/PID", &pid.to_string()])
        }
    }
}

/// Force-terminate the whole child tree.
pub fn killall(pid: i32) -> io::Result<()> {
    debug!("Force-killing process tree rooted at {}", pid);
    taskkill(&["/F", "/T", "/PID", &pid.to_string()])
}

/// Force-kill the direct child PID only.
pub fn kill_direct(pid: i32) -> io::Result<()> {
    taskkill(&["/F", "/PID", &pid.to_string()])
}

fn taskkill(args: &[&str]) -> io::Result<()> {
    // taskkill reports an already-exited target through its own exit code;
    // like the Unix ESRCH case that is not a delivery failure.
    StdCommand::new("taskkill").args(args).status().map(|_| ())
}
