//! Exit-status record and GNU-compatible exit-code encoding

use std::process::ExitStatus as WaitStatus;

/// Exit statuses identical to GNU timeout(1).
pub const EXIT_TIMED_OUT: i32 = 124;
/// Supervisor-internal failure (bad input, pipe setup, unclassified spawn error).
pub const EXIT_UNKNOWN_ERR: i32 = 125;
/// Command found but could not be invoked.
pub const EXIT_NOT_INVOKED: i32 = 126;
/// Command not found.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Child was force-killed by the supervisor.
pub const EXIT_KILLED: i32 = 137;

/// Terminal reason the supervisor attributes to a child's exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitKind {
    /// The child exited on its own.
    #[default]
    Normal,
    /// The duration timer fired and the termination signal was delivered.
    TimedOut,
    /// The kill-after grace expired and the whole tree was force-killed.
    Killed,
    /// The external cancellation token fired. Sticky: a later force kill
    /// sets `killed` but does not relabel the exit.
    Canceled,
}

/// Immutable record describing how a supervised child terminated.
///
/// Produced exactly once per started child; carries no resources and may be
/// freely copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitStatus {
    /// Exit status in GNU-compatible encoding: `137` when force-killed,
    /// `124` on a plain timeout unless preserve-status was requested,
    /// otherwise the child's own code (`128 + signo` for a signaled child).
    pub code: i32,
    /// True when the child terminated due to a signal. Always false on Windows.
    pub signaled: bool,
    /// Terminal reason attributed by the supervisor.
    pub kind: ExitKind,
    /// True when the supervisor force-killed the child. Orthogonal to
    /// `kind`: a cancellation path can kill without relabeling.
    pub killed: bool,
}

impl ExitStatus {
    /// Whether the duration timer drove this exit (including the escalation
    /// to a force kill).
    pub fn is_timed_out(&self) -> bool {
        matches!(self.kind, ExitKind::TimedOut | ExitKind::Killed)
    }

    /// Whether the external cancellation token drove this exit.
    pub fn is_canceled(&self) -> bool {
        self.kind == ExitKind::Canceled
    }

    /// Whether the supervisor force-killed the child.
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Rewrite `code` into its reason-encoded form.
    ///
    /// A force kill always reports [`EXIT_KILLED`]. A plain timeout reports
    /// [`EXIT_TIMED_OUT`] unless `preserve_status` asks for the child's own
    /// code. Every other path (normal exit, cancellation without a kill)
    /// keeps the child's resolved code.
    pub(crate) fn into_final(mut self, preserve_status: bool) -> Self {
        if self.killed {
            self.code = EXIT_KILLED;
        } else if self.kind == ExitKind::TimedOut && !preserve_status {
            self.code = EXIT_TIMED_OUT;
        }
        self
    }
}

/// Translate a platform wait-status into `(code, signaled)`.
///
/// Normal exits report the child's return value; a signal-terminated child
/// reports `128 + signo` with `signaled` set; a status that carries neither
/// resolves to `-1`.
pub(crate) fn resolve_wait_status(status: WaitStatus) -> (i32, bool) {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        match status.code() {
            Some(code) => (code, false),
            None => match status.signal() {
                Some(signo) => (128 + signo, true),
                None => (-1, false),
            },
        }
    }
    #[cfg(not(unix))]
    {
        (status.code().unwrap_or(-1), false)
    }
}
