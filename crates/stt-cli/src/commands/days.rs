//! `stt days`: list tracked days with their first activity.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use stt_core::{ItemLog, queries};

use super::util::label;

pub fn run<W: Write>(writer: &mut W, log: &ItemLog, since: Option<NaiveDate>) -> Result<()> {
    let reader = log
        .reader()
        .with_context(|| format!("failed to open {}", log.path().display()))?;
    let firsts = queries::first_items_of_days(reader)
        .with_context(|| format!("failed to read {}", log.path().display()))?;

    let mut listed = 0_usize;
    for item in firsts
        .iter()
        .filter(|item| since.is_none_or(|since| item.day() >= since))
    {
        writeln!(
            writer,
            "{}  {}  {}",
            item.start().format("%Y-%m-%d  %a"),
            item.start().format("%H:%M"),
            label(item)
        )?;
        listed += 1;
    }
    if listed == 0 {
        writeln!(writer, "No activities recorded.")?;
    }
    Ok(())
}
