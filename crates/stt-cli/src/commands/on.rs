//! `stt on`: start a new activity.

use std::io::Write;

use anyhow::{Context, Result};
use stt_core::{Clock, ItemLog, TimeTrackingItem};

use super::util::{format_elapsed, label, parse_activity};

pub fn run<W: Write, K: Clock>(
    writer: &mut W,
    log: &ItemLog,
    words: &[String],
    clock: &K,
) -> Result<()> {
    let activity = parse_activity(&words.join(" "), clock.now())?;

    if let Some(end) = activity.end {
        let item = TimeTrackingItem::finished(activity.comment, activity.start, end)
            .context("invalid activity period")?;
        log.insert(item.clone())
            .with_context(|| format!("failed to update {}", log.path().display()))?;
        writeln!(
            writer,
            "added: {} ({} - {})",
            label(&item),
            item.start().format("%Y-%m-%d %H:%M"),
            end.format("%H:%M")
        )?;
        return Ok(());
    }

    let item = TimeTrackingItem::new(activity.comment, activity.start);
    let ended = log
        .start(item.clone())
        .with_context(|| format!("failed to update {}", log.path().display()))?;

    if let Some(ended) = ended {
        let elapsed = ended.duration_until(item.start());
        writeln!(writer, "ended: {} ({})", label(&ended), format_elapsed(elapsed))?;
    }
    writeln!(writer, "started: {}", label(&item))?;
    Ok(())
}
