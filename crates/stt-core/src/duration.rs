//! Parsing and formatting of human-readable durations.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;
use thiserror::Error;

/// Accepts `8h`, `7h30m`, `45m`, `1h 5m` and a bare `0`.
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+)h)?\s*(?:(\d+)m)?$").unwrap());

/// Largest accepted hour count (one year).
const MAX_HOURS: i64 = 366 * 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid duration `{0}`, expected e.g. 8h, 7h30m or 45m")]
pub struct DurationParseError(pub String);

/// Parses a duration such as `7h30m`.
pub fn parse_duration(s: &str) -> Result<TimeDelta, DurationParseError> {
    let trimmed = s.trim();
    if trimmed == "0" {
        return Ok(TimeDelta::zero());
    }

    let invalid = || DurationParseError(s.to_string());
    let caps = DURATION_RE.captures(trimmed).ok_or_else(invalid)?;
    if caps.get(1).is_none() && caps.get(2).is_none() {
        return Err(invalid());
    }

    let field = |idx| -> Result<i64, DurationParseError> {
        caps.get(idx)
            .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| invalid()))
    };
    let hours = field(1)?;
    let minutes = field(2)?;
    if hours > MAX_HOURS || minutes > MAX_HOURS * 60 {
        return Err(invalid());
    }

    Ok(TimeDelta::hours(hours) + TimeDelta::minutes(minutes))
}

/// Formats a signed duration as `+1h 05m` / `-0h 30m`, truncated to minutes.
pub fn format_signed_duration(delta: TimeDelta) -> String {
    let minutes = delta.num_minutes();
    let sign = if minutes < 0 { '-' } else { '+' };
    let minutes = minutes.abs();
    format!("{sign}{}h {:02}m", minutes / 60, minutes % 60)
}
