//! Duration-string parsing for the supervisor's small CLI surface
//!
//! The accepted grammar is `<num>[smhd]`: a signed float (exponent notation
//! included) with an optional unit suffix. The permissiveness is inherited
//! deliberately; non-positive results are interpreted as "no timer" at the
//! single conversion point, [`duration_from_secs`].

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{HourglassError, Result};

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-0-9e.]+)([smhd])?$").expect("duration pattern is valid"));

/// Parse `<num>[smhd]` into a fractional second count.
///
/// The suffix multiplies the base: absent or `s` means seconds, `m` minutes,
/// `h` hours, `d` days. Any other shape reports an invalid duration.
pub fn parse_duration(input: &str) -> Result<f64> {
    let caps = DURATION_RE
        .captures(input)
        .ok_or_else(|| HourglassError::InvalidDuration(input.to_string()))?;
    let base: f64 = caps[1]
        .parse()
        .map_err(|_| HourglassError::InvalidDuration(input.to_string()))?;
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        None | Some("s") => 1.0,
        Some("m") => 60.0,
        Some("h") => 3600.0,
        Some("d") => 86400.0,
        Some(_) => unreachable!("suffix character class is closed"),
    };
    Ok(base * multiplier)
}

/// Convert a parsed second count into a timer interval.
///
/// Non-positive and non-finite counts become `Duration::ZERO`, which the
/// supervisor treats as "no duration timer"; counts beyond what a
/// `Duration` can hold saturate.
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
