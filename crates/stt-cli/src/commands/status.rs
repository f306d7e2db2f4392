//! `stt status`: show the running activity.

use std::io::Write;

use anyhow::{Context, Result};
use stt_core::{Clock, ItemLog, queries};

use super::util::{format_elapsed, label};

pub fn run<W: Write, K: Clock>(writer: &mut W, log: &ItemLog, clock: &K) -> Result<()> {
    let reader = log
        .reader()
        .with_context(|| format!("failed to open {}", log.path().display()))?;
    let ongoing = queries::ongoing_item(reader)
        .with_context(|| format!("failed to read {}", log.path().display()))?;

    writeln!(writer, "Log: {}", log.path().display())?;
    let Some(item) = ongoing else {
        writeln!(writer, "Nothing is running.")?;
        return Ok(());
    };
    writeln!(
        writer,
        "Running: {} since {} ({})",
        label(&item),
        item.start().format("%Y-%m-%d %H:%M"),
        format_elapsed(item.duration_until(clock.now()))
    )?;

    let reader = log
        .reader()
        .with_context(|| format!("failed to open {}", log.path().display()))?;
    let adjacent = queries::adjacent_items(reader, &item)
        .with_context(|| format!("failed to read {}", log.path().display()))?;
    if let Some(previous) = adjacent.previous {
        writeln!(
            writer,
            "Previous: {} ({})",
            label(&previous),
            format_elapsed(previous.duration_until(item.start()))
        )?;
    }
    Ok(())
}
