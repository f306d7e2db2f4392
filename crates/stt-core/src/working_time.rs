//! Required working time per calendar day.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

/// Supplies the working time expected on a given day.
///
/// Implementations must be deterministic for a given day.
pub trait WorkingTimeProvider {
    fn working_time_for(&self, day: NaiveDate) -> TimeDelta;
}

impl<P: WorkingTimeProvider + ?Sized> WorkingTimeProvider for &P {
    fn working_time_for(&self, day: NaiveDate) -> TimeDelta {
        (**self).working_time_for(day)
    }
}

/// A weekly schedule with per-date exceptions (holidays, half days).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyWorkingTime {
    /// Indexed by `Weekday::num_days_from_monday`.
    weekdays: [TimeDelta; 7],
    overrides: BTreeMap<NaiveDate, TimeDelta>,
}

impl WeeklyWorkingTime {
    /// Same working time every weekday, nothing on weekends.
    pub fn weekdays(per_day: TimeDelta) -> Self {
        let mut weekdays = [per_day; 7];
        weekdays[Weekday::Sat.num_days_from_monday() as usize] = TimeDelta::zero();
        weekdays[Weekday::Sun.num_days_from_monday() as usize] = TimeDelta::zero();
        Self {
            weekdays,
            overrides: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_weekday(mut self, weekday: Weekday, duration: TimeDelta) -> Self {
        self.weekdays[weekday.num_days_from_monday() as usize] = duration;
        self
    }

    #[must_use]
    pub fn with_override(mut self, day: NaiveDate, duration: TimeDelta) -> Self {
        self.overrides.insert(day, duration);
        self
    }
}

impl Default for WeeklyWorkingTime {
    fn default() -> Self {
        Self::weekdays(TimeDelta::hours(8))
    }
}

impl WorkingTimeProvider for WeeklyWorkingTime {
    fn working_time_for(&self, day: NaiveDate) -> TimeDelta {
        self.overrides
            .get(&day)
            .copied()
            .unwrap_or_else(|| self.weekdays[day.weekday().num_days_from_monday() as usize])
    }
}
