//! Textual signal resolution
//!
//! Maps the closed identifier set accepted on the command line to the
//! platform's termination-signal representation.

use crate::error::{HourglassError, Result};

/// Platform termination signal delivered at duration expiry.
#[cfg(unix)]
pub type TermSignal = nix::sys::signal::Signal;

/// Termination request representation on Windows, where the choice is
/// between a console interrupt and a hard kill.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSignal {
    /// Console interrupt (the Windows stand-in for every catchable signal).
    Interrupt,
    /// Hard kill.
    Kill,
}

/// The signal used when the supervisor configuration leaves it unset.
#[cfg(unix)]
pub fn default_signal() -> TermSignal {
    TermSignal::SIGTERM
}

/// The signal used when the supervisor configuration leaves it unset.
#[cfg(windows)]
pub fn default_signal() -> TermSignal {
    TermSignal::Interrupt
}

/// Resolve a textual signal identifier, case-insensitively.
///
/// Empty input resolves to `None`, meaning the supervisor default. Unknown
/// tokens fail as invalid; `USR1`/`USR2` fail as unsupported on platforms
/// without them.
#[cfg(unix)]
pub fn parse_signal(input: &str) -> Result<Option<TermSignal>> {
    use nix::sys::signal::Signal::*;

    let sig = match input.to_ascii_uppercase().as_str() {
        "" => return Ok(None),
        "HUP" | "1" => SIGHUP,
        "INT" | "2" => SIGINT,
        "QUIT" | "3" => SIGQUIT,
        "KILL" | "9" => SIGKILL,
        "ALRM" | "14" => SIGALRM,
        "TERM" | "15" => SIGTERM,
        "USR1" => SIGUSR1,
        "USR2" => SIGUSR2,
        _ => return Err(HourglassError::InvalidSignal(input.to_string())),
    };
    Ok(Some(sig))
}

/// Resolve a textual signal identifier, case-insensitively.
///
/// Empty input resolves to `None`, meaning the supervisor default. Unknown
/// tokens fail as invalid; `USR1`/`USR2` fail as unsupported on platforms
/// without them.
#[cfg(windows)]
pub fn parse_signal(input: &str) -> Result<Option<TermSignal>> {
    let sig = match input.to_ascii_uppercase().as_str() {
        "" => return Ok(None),
        "HUP" | "1" | "INT" | "2" | "QUIT" | "3" | "ALRM" | "14" | "TERM" | "15" => {
            TermSignal::Interrupt
        }
        "KILL" | "9" => TermSignal::Kill,
        "USR1" | "USR2" => return Err(HourglassError::UnsupportedSignal(input.to_string())),
        _ => return Err(HourglassError::InvalidSignal(input.to_string())),
    };
    Ok(Some(sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_selects_the_default() {
        assert!(parse_signal("").unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn names_and_numbers_resolve() {
        assert_eq!(parse_signal("TERM").unwrap(), Some(TermSignal::SIGTERM));
        assert_eq!(parse_signal("15").unwrap(), Some(TermSignal::SIGTERM));
        assert_eq!(parse_signal("INT").unwrap(), Some(TermSignal::SIGINT));
        assert_eq!(parse_signal("9").unwrap(), Some(TermSignal::SIGKILL));
        assert_eq!(parse_signal("USR2").unwrap(), Some(TermSignal::SIGUSR2));
    }

    #[cfg(unix)]
    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(parse_signal("term").unwrap(), Some(TermSignal::SIGTERM));
        assert_eq!(parse_signal("Hup").unwrap(), Some(TermSignal::SIGHUP));
    }

    #[test]
    fn unknown_tokens_are_invalid() {
        assert!(matches!(
            parse_signal("WINCH"),
            Err(HourglassError::InvalidSignal(_))
        ));
        assert!(matches!(
            parse_signal("42"),
            Err(HourglassError::InvalidSignal(_))
        ));
    }
}
