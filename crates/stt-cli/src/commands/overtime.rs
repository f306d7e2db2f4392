//! `stt overtime`: per-day overtime against the configured working time.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use stt_core::duration::format_signed_duration;
use stt_core::{Clock, OvertimeReport, OvertimeReportGenerator};

use crate::Config;

/// Width of the `YYYY-MM-DD  Www  ` prefix of a day row.
const LABEL_WIDTH: usize = 17;
const VALUE_WIDTH: usize = 9;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    timezone: &'a str,
    days: Vec<JsonDay>,
    total_minutes: i64,
}

#[derive(Debug, Serialize)]
struct JsonDay {
    date: NaiveDate,
    overtime_minutes: i64,
}

pub fn run<W: Write, K: Clock>(
    writer: &mut W,
    config: &Config,
    since: Option<NaiveDate>,
    json: bool,
    clock: &K,
) -> Result<()> {
    let log = config.item_log();
    let schedule = config
        .working_time
        .schedule()
        .context("invalid working time configuration")?;
    let reader = log
        .reader()
        .with_context(|| format!("failed to open {}", log.path().display()))?;

    let report = OvertimeReportGenerator::new(reader, config.categorizer(), schedule)
        .with_clock(clock)
        .generate_report()
        .with_context(|| format!("failed to read {}", log.path().display()))?;
    let report = match since {
        Some(since) => report.since(since),
        None => report,
    };

    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "local time".to_string());
    let output = if json {
        render_json(&report, &timezone)?
    } else {
        render_text(&report, &timezone)
    };
    writer.write_all(output.as_bytes())?;
    Ok(())
}

/// Renders the report as an aligned table with a total row.
pub fn render_text(report: &OvertimeReport, timezone: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Overtime ({timezone})");

    if report.is_empty() {
        let _ = writeln!(out, "No worktime recorded.");
        return out;
    }

    for (day, overtime) in report {
        let label = format!("{}  {}", day.format("%Y-%m-%d"), day.format("%a"));
        let _ = writeln!(
            out,
            "{label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
            format_signed_duration(*overtime)
        );
    }
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
        "Total",
        format_signed_duration(report.total())
    );
    out
}

/// Renders the report as pretty-printed JSON with minute resolution.
pub fn render_json(report: &OvertimeReport, timezone: &str) -> Result<String> {
    let days = report
        .iter()
        .map(|(day, overtime)| JsonDay {
            date: *day,
            overtime_minutes: overtime.num_minutes(),
        })
        .collect();
    let json = JsonReport {
        timezone,
        days,
        total_minutes: report.total().num_minutes(),
    };
    let mut out = serde_json::to_string_pretty(&json).context("failed to serialize report")?;
    out.push('\n');
    Ok(out)
}
