//! Platform adaptor: process-group creation, termination-signal delivery,
//! and whole-tree force kill
//!
//! The supervisor acts on the child exclusively through these functions so
//! the state machine itself stays platform-neutral.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::{configure_command, kill_direct, killall, terminate};
#[cfg(windows)]
pub use windows::{configure_command, kill_direct, killall, terminate};
