//! Core error types and utilities

use std::io;

use thiserror::Error;

use crate::status::{EXIT_NOT_FOUND, EXIT_NOT_INVOKED, EXIT_UNKNOWN_ERR};

/// Errors produced while configuring or starting a supervised command.
///
/// Signal-delivery failures observed mid-supervision are not represented
/// here: the supervisor logs and swallows them, and the kill timer is the
/// backstop.
#[derive(Error, Debug)]
pub enum HourglassError {
    /// The duration string did not match the accepted grammar.
    #[error("duration format invalid: {0}")]
    InvalidDuration(String),

    /// The signal token is not in the recognized set.
    #[error("{0}: invalid signal")]
    InvalidSignal(String),

    /// The signal token is recognized but cannot be delivered on this platform.
    #[error("{0}: unsupported signal on this platform")]
    UnsupportedSignal(String),

    /// The command executable was not found.
    #[error("command not found: {0}")]
    CommandNotFound(#[source] io::Error),

    /// The command exists but could not be invoked (permissions, not a binary).
    #[error("command could not be invoked: {0}")]
    CommandNotInvoked(#[source] io::Error),

    /// Any other failure while starting the child.
    #[error("failed to start command: {0}")]
    Spawn(#[source] io::Error),

    /// Standard stream plumbing could not be set up.
    #[error("failed to set up stdio pipes: {0}")]
    Pipe(String),
}

impl HourglassError {
    /// GNU-compatible exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandNotFound(_) => EXIT_NOT_FOUND,
            Self::CommandNotInvoked(_) => EXIT_NOT_INVOKED,
            Self::InvalidDuration(_)
            | Self::InvalidSignal(_)
            | Self::UnsupportedSignal(_)
            | Self::Spawn(_)
            | Self::Pipe(_) => EXIT_UNKNOWN_ERR,
        }
    }

    /// Classify a spawn failure into its exit-code-bearing variant.
    pub(crate) fn from_spawn(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::CommandNotFound(err),
            io::ErrorKind::PermissionDenied => Self::CommandNotInvoked(err),
            _ => Self::Spawn(err),
        }
    }
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, HourglassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_the_contract() {
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(HourglassError::from_spawn(not_found).exit_code(), 127);

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(HourglassError::from_spawn(denied).exit_code(), 126);

        let other = io::Error::other("boom");
        assert_eq!(HourglassError::from_spawn(other).exit_code(), 125);

        assert_eq!(HourglassError::InvalidDuration("1x".into()).exit_code(), 125);
        assert_eq!(HourglassError::InvalidSignal("WINCH".into()).exit_code(), 125);
    }

    #[test]
    fn display_matches_the_cli_diagnostics() {
        let err = HourglassError::InvalidDuration("abc".to_string());
        assert_eq!(err.to_string(), "duration format invalid: abc");

        let err = HourglassError::InvalidSignal("FOO".to_string());
        assert_eq!(err.to_string(), "FOO: invalid signal");
    }
}
