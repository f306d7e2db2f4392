//! `stt fin`: end the running activity.

use std::io::Write;

use anyhow::{Context, Result};
use stt_core::{Clock, ItemLog};

use super::util::{format_elapsed, label, parse_end_time};

pub fn run<W: Write, K: Clock>(
    writer: &mut W,
    log: &ItemLog,
    words: &[String],
    clock: &K,
) -> Result<()> {
    let end = parse_end_time(&words.join(" "), clock.now())?;
    let finished = log
        .finish(end)
        .with_context(|| format!("failed to update {}", log.path().display()))?;

    match finished {
        Some(item) => writeln!(
            writer,
            "ended: {} ({})",
            label(&item),
            format_elapsed(item.duration_until(end))
        )?,
        None => writeln!(writer, "Nothing is running.")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use stt_core::{FixedClock, TimeTrackingItem};

    use super::*;

    fn at(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn fin_ends_running_item() {
        let dir = tempfile::tempdir().unwrap();
        let log = ItemLog::new(dir.path().join("activities"));
        log.start(TimeTrackingItem::new(Some("coding".into()), at(9, 0)))
            .unwrap();

        let mut output = Vec::new();
        run(&mut output, &log, &[], &FixedClock(at(9, 20))).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "ended: coding (20m)\n");
        assert_eq!(log.read_all().unwrap()[0].end(), Some(at(9, 20)));
    }

    #[test]
    fn fin_without_running_item() {
        let dir = tempfile::tempdir().unwrap();
        let log = ItemLog::new(dir.path().join("activities"));

        let mut output = Vec::new();
        run(&mut output, &log, &[], &FixedClock(at(9, 20))).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Nothing is running.\n");
    }

    #[test]
    fn fin_before_start_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = ItemLog::new(dir.path().join("activities"));
        log.start(TimeTrackingItem::new(None, at(9, 0))).unwrap();

        let mut output = Vec::new();
        let err = run(&mut output, &log, &[], &FixedClock(at(8, 0))).unwrap_err();
        assert!(err.to_string().starts_with("failed to update"));
    }

    #[test]
    fn fin_at_given_time() {
        let dir = tempfile::tempdir().unwrap();
        let log = ItemLog::new(dir.path().join("activities"));
        log.start(TimeTrackingItem::new(Some("coding".into()), at(9, 0)))
            .unwrap();

        let mut output = Vec::new();
        let words = ["at".to_string(), "11:30".to_string()];
        run(&mut output, &log, &words, &FixedClock(at(12, 0))).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "ended: coding (2h 30m)\n");
        assert_eq!(log.read_all().unwrap()[0].end(), Some(at(11, 30)));
    }

    #[test]
    fn fin_rejects_unknown_time_expression() {
        let dir = tempfile::tempdir().unwrap();
        let log = ItemLog::new(dir.path().join("activities"));

        let mut output = Vec::new();
        let words = ["soon".to_string()];
        let err = run(&mut output, &log, &words, &FixedClock(at(12, 0))).unwrap_err();
        assert!(err.to_string().starts_with("Invalid end time: soon"));
    }
}
