//! `stt resume`: restart the last finished activity.

use std::io::Write;

use anyhow::{Context, Result};
use stt_core::{Clock, ItemLog};

use super::util::label;

pub fn run<W: Write, K: Clock>(writer: &mut W, log: &ItemLog, clock: &K) -> Result<()> {
    let resumed = log
        .resume(clock.now())
        .with_context(|| format!("failed to update {}", log.path().display()))?;

    match resumed {
        Some(item) => writeln!(writer, "resumed: {}", label(&item))?,
        None => writeln!(writer, "Nothing to resume.")?,
    }
    Ok(())
}
