//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;
use stt_core::TimeTrackingItem;

/// A point in time: `HH:MM[:SS]`, optionally preceded by `YYYY-MM-DD` or
/// `YYYY.MM.DD`.
const TIME_POINT: &str = r"(?:\d{4}[-.]\d{2}[-.]\d{2}\s+)?\d{1,2}:\d{2}(?::\d{2})?";

static SINCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s)^(?:(.*?)\s+)?since\s+({TIME_POINT})(?:\s+until\s+({TIME_POINT}))?$"
    ))
    .unwrap()
});

static FROM_TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s)^(?:(.*?)\s+)?from\s+({TIME_POINT})(?:\s+to\s+({TIME_POINT}))?$"
    ))
    .unwrap()
});

static AGO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(?:(.*?)\s+)?(\d+)\s*(hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)\s+ago$",
    )
    .unwrap()
});

static AT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^at\s+({TIME_POINT})$")).unwrap());

/// Upper bound for `<n> <unit> ago` (~1000 years in seconds).
const MAX_AGO_SECONDS: i64 = 1000 * 365 * 24 * 60 * 60;

/// An activity as typed after `stt on`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityText {
    pub comment: Option<String>,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

/// Parses an activity description with an optional trailing time expression.
///
/// Supports:
/// - `<comment>`: starts now
/// - `<comment> since <time> [until <time>]`
/// - `<comment> from <time> [to <time>]`
/// - `<comment> <n> hours|minutes|seconds ago`
///
/// A time without a date is taken on the day of `now`.
pub fn parse_activity(text: &str, now: NaiveDateTime) -> anyhow::Result<ActivityText> {
    let text = text.trim();
    let today = now.date();

    let (comment, start, end) = if let Some(caps) = SINCE_RE
        .captures(text)
        .or_else(|| FROM_TO_RE.captures(text))
    {
        let start = parse_time_point(&caps[2], today)?;
        let end = caps
            .get(3)
            .map(|m| parse_time_point(m.as_str(), today))
            .transpose()?;
        (caps.get(1).map(|m| m.as_str()), start, end)
    } else if let Some(caps) = AGO_RE.captures(text) {
        let start = parse_ago(&caps[2], &caps[3], now)?;
        (caps.get(1).map(|m| m.as_str()), start, None)
    } else {
        (Some(text), now, None)
    };

    Ok(ActivityText {
        comment: comment
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string),
        start,
        end,
    })
}

/// Parses the end time given to `stt fin`: nothing for now, or `at <time>`.
pub fn parse_end_time(text: &str, now: NaiveDateTime) -> anyhow::Result<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(now);
    }
    let Some(caps) = AT_RE.captures(text) else {
        bail!("Invalid end time: {text}. Use 'at <time>' (e.g., 'at 17:30')");
    };
    parse_time_point(&caps[1], now.date())
}

fn parse_time_point(text: &str, today: NaiveDate) -> anyhow::Result<NaiveDateTime> {
    let (date, time) = match text.split_once(char::is_whitespace) {
        Some((date, time)) => {
            let date = NaiveDate::parse_from_str(&date.replace('.', "-"), "%Y-%m-%d")
                .with_context(|| format!("Invalid date: {date}"))?;
            (date, time.trim())
        }
        None => (today, text),
    };
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .with_context(|| format!("Invalid time: {time}"))?;
    Ok(date.and_time(time))
}

fn parse_ago(amount: &str, unit: &str, now: NaiveDateTime) -> anyhow::Result<NaiveDateTime> {
    let n: i64 = amount
        .parse()
        .context("failed to parse number in relative time")?;
    let seconds_per_unit = match unit.chars().next() {
        Some('h') => 60 * 60,
        Some('m') => 60,
        _ => 1,
    };
    if n > MAX_AGO_SECONDS / seconds_per_unit {
        bail!("Relative time value too large: {n} {unit}");
    }
    Ok(now - TimeDelta::seconds(n * seconds_per_unit))
}

/// Formats an elapsed duration as `Xh YYm`, or `Ym` below one hour.
pub fn format_elapsed(delta: TimeDelta) -> String {
    let total_minutes = delta.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours >= 1 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}

/// One-line label for an item: the first line of its comment.
pub fn label(item: &TimeTrackingItem) -> &str {
    item.comment()
        .and_then(|c| c.lines().next())
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("(no comment)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn parsed(text: &str) -> (Option<String>, NaiveDateTime, Option<NaiveDateTime>) {
        let activity = parse_activity(text, at(4, 12, 0)).unwrap();
        (activity.comment, activity.start, activity.end)
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(TimeDelta::minutes(5)), "5m");
        assert_eq!(format_elapsed(TimeDelta::minutes(90)), "1h 30m");
        assert_eq!(format_elapsed(TimeDelta::minutes(125)), "2h 05m");
        assert_eq!(format_elapsed(TimeDelta::minutes(-5)), "0m");
    }

    #[test]
    fn test_label_uses_first_comment_line() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let item = TimeTrackingItem::new(Some("release\nchecklist".into()), start);
        assert_eq!(label(&item), "release");
        assert_eq!(label(&TimeTrackingItem::new(None, start)), "(no comment)");
    }

    #[test]
    fn test_parse_activity_now() {
        assert_eq!(parsed("write report"), (Some("write report".into()), at(4, 12, 0), None));
        assert_eq!(parsed("  "), (None, at(4, 12, 0), None));
    }

    #[test]
    fn test_parse_activity_since() {
        assert_eq!(parsed("coding since 9:30"), (Some("coding".into()), at(4, 9, 30), None));
        assert_eq!(parsed("since 09:30:00"), (None, at(4, 9, 30), None));
        assert_eq!(
            parsed("coding since 2024-03-01 08:00 until 2024.03.01 10:15"),
            (Some("coding".into()), at(1, 8, 0), Some(at(1, 10, 15)))
        );
    }

    #[test]
    fn test_parse_activity_from_to() {
        assert_eq!(
            parsed("talk from 10:00 to 11:30"),
            (Some("talk".into()), at(4, 10, 0), Some(at(4, 11, 30)))
        );
        assert_eq!(parsed("talk from 10:00"), (Some("talk".into()), at(4, 10, 0), None));
    }

    #[test]
    fn test_parse_activity_ago() {
        assert_eq!(parsed("mail 10 min ago"), (Some("mail".into()), at(4, 11, 50), None));
        assert_eq!(parsed("mail 2 hours ago"), (Some("mail".into()), at(4, 10, 0), None));
        assert_eq!(parsed("mail 30s ago").1, at(4, 12, 0) - TimeDelta::seconds(30));
        assert!(parse_activity("mail 99999999999999 hours ago", at(4, 12, 0)).is_err());
    }

    #[test]
    fn test_time_words_inside_comment_are_kept() {
        assert_eq!(
            parsed("read since 9:00 notes since 10:00"),
            (Some("read since 9:00 notes".into()), at(4, 10, 0), None)
        );
        assert_eq!(
            parsed("migrate from v1 to v2"),
            (Some("migrate from v1 to v2".into()), at(4, 12, 0), None)
        );
    }

    #[test]
    fn test_parse_activity_rejects_impossible_time() {
        let err = parse_activity("coding since 25:00", at(4, 12, 0)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid time: 25:00");
    }

    #[test]
    fn test_parse_end_time() {
        assert_eq!(parse_end_time("", at(4, 12, 0)).unwrap(), at(4, 12, 0));
        assert_eq!(parse_end_time("at 17:45", at(4, 12, 0)).unwrap(), at(4, 17, 45));
        assert_eq!(
            parse_end_time("at 2024-03-02 18:00", at(4, 12, 0)).unwrap(),
            at(2, 18, 0)
        );
        assert!(parse_end_time("later", at(4, 12, 0)).is_err());
    }
}
