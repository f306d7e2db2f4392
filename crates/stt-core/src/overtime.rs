//! Overtime report generation.
//!
//! Folds a stream of items into a per-day balance against the required
//! working time:
//!
//! 1. Items not classified as [`ItemCategory::Worktime`] are ignored.
//! 2. The first worktime item of a day seeds the day with its duration minus
//!    the required working time for that day.
//! 3. Later items of the same day add their duration.
//!
//! The required working time is therefore subtracted once per day, and only
//! for days with at least one worktime item.

use std::collections::BTreeMap;
use std::collections::btree_map::{Entry, Iter};

use chrono::{NaiveDate, TimeDelta};

use crate::category::{ItemCategorizer, ItemCategory};
use crate::clock::{Clock, SystemClock};
use crate::reader::{ItemReader, ReadError};
use crate::working_time::WorkingTimeProvider;

/// Overtime per day, ordered by day. Negative values are deficits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OvertimeReport {
    days: BTreeMap<NaiveDate, TimeDelta>,
}

impl OvertimeReport {
    pub fn get(&self, day: NaiveDate) -> Option<TimeDelta> {
        self.days.get(&day).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, NaiveDate, TimeDelta> {
        self.days.iter()
    }

    /// Sum over all days.
    pub fn total(&self) -> TimeDelta {
        self.days.values().fold(TimeDelta::zero(), |acc, d| acc + *d)
    }

    /// Keeps only days on or after `since`.
    #[must_use]
    pub fn since(mut self, since: NaiveDate) -> Self {
        self.days = self.days.split_off(&since);
        self
    }
}

impl<'a> IntoIterator for &'a OvertimeReport {
    type Item = (&'a NaiveDate, &'a TimeDelta);
    type IntoIter = Iter<'a, NaiveDate, TimeDelta>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

/// Computes an [`OvertimeReport`] in a single pass over a reader.
#[derive(Debug)]
pub struct OvertimeReportGenerator<R, C, W, K = SystemClock> {
    reader: R,
    categorizer: C,
    working_time: W,
    clock: K,
}

impl<R, C, W> OvertimeReportGenerator<R, C, W>
where
    R: ItemReader,
    C: ItemCategorizer,
    W: WorkingTimeProvider,
{
    pub const fn new(reader: R, categorizer: C, working_time: W) -> Self {
        Self {
            reader,
            categorizer,
            working_time,
            clock: SystemClock,
        }
    }
}

impl<R, C, W, K> OvertimeReportGenerator<R, C, W, K>
where
    R: ItemReader,
    C: ItemCategorizer,
    W: WorkingTimeProvider,
    K: Clock,
{
    /// Replaces the clock used to measure still-running items.
    pub fn with_clock<K2: Clock>(self, clock: K2) -> OvertimeReportGenerator<R, C, W, K2> {
        OvertimeReportGenerator {
            reader: self.reader,
            categorizer: self.categorizer,
            working_time: self.working_time,
            clock,
        }
    }

    /// Reads the whole stream and returns the per-day overtime.
    ///
    /// The reader is closed before returning, also when reading fails.
    pub fn generate_report(mut self) -> Result<OvertimeReport, ReadError> {
        let result = self.accumulate();
        self.reader.close();
        result
    }

    fn accumulate(&mut self) -> Result<OvertimeReport, ReadError> {
        let now = self.clock.now();
        let mut days = BTreeMap::new();
        let mut counted = 0_usize;

        while let Some(item) = self.reader.read()? {
            if self.categorizer.category(item.comment()) != ItemCategory::Worktime {
                continue;
            }
            counted += 1;

            let day = item.day();
            let duration = item.duration_until(now);
            match days.entry(day) {
                Entry::Occupied(mut entry) => {
                    let accumulated = *entry.get() + duration;
                    entry.insert(accumulated);
                }
                Entry::Vacant(entry) => {
                    entry.insert(duration - self.working_time.working_time_for(day));
                }
            }
        }

        tracing::debug!(items = counted, days = days.len(), "computed overtime");
        Ok(OvertimeReport { days })
    }
}
