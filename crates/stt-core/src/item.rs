//! Time tracking items.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use thiserror::Error;

/// Validation errors for [`TimeTrackingItem`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The end of the interval lies before its start.
    #[error("end {end} is before start {start}")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// One tracked activity: a start, an optional end and an optional comment.
///
/// Timestamps are local wall-clock times as they appear in the log. An item
/// without an end is still running.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeTrackingItem {
    comment: Option<String>,
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
}

impl TimeTrackingItem {
    /// Creates an open-ended item.
    pub fn new(comment: Option<String>, start: NaiveDateTime) -> Self {
        Self {
            comment,
            start,
            end: None,
        }
    }

    /// Creates a finished item.
    ///
    /// Returns an error if `end` is before `start`.
    pub fn finished(
        comment: Option<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Self::new(comment, start).with_end(end)
    }

    /// Returns a copy of this item ending at `end`.
    pub fn with_end(self, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if end < self.start {
            return Err(ValidationError::EndBeforeStart {
                start: self.start,
                end,
            });
        }
        Ok(Self {
            end: Some(end),
            ..self
        })
    }

    /// Returns a copy of this item starting at `start`.
    pub fn with_start(self, start: NaiveDateTime) -> Result<Self, ValidationError> {
        if let Some(end) = self.end.filter(|end| *end < start) {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(Self { start, ..self })
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    /// Whether the item is still running.
    pub const fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }

    /// The calendar day this item is bucketed under: the day of its start.
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Elapsed time, measuring an open-ended item up to `now`.
    ///
    /// Never negative: an open item that starts after `now` yields zero.
    pub fn duration_until(&self, now: NaiveDateTime) -> TimeDelta {
        let end = self.end.unwrap_or(now);
        (end - self.start).max(TimeDelta::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn finished_rejects_end_before_start() {
        let err = TimeTrackingItem::finished(None, at(10, 0), at(9, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::EndBeforeStart {
                start: at(10, 0),
                end: at(9, 0)
            }
        );
    }

    #[test]
    fn finished_accepts_zero_length() {
        let item = TimeTrackingItem::finished(None, at(10, 0), at(10, 0)).unwrap();
        assert_eq!(item.duration_until(at(12, 0)), TimeDelta::zero());
    }

    #[test]
    fn with_start_keeps_end_after_start() {
        let item = TimeTrackingItem::finished(None, at(9, 0), at(12, 0)).unwrap();
        let moved = item.clone().with_start(at(10, 0)).unwrap();
        assert_eq!((moved.start(), moved.end()), (at(10, 0), Some(at(12, 0))));
        assert!(item.with_start(at(13, 0)).is_err());
        assert!(TimeTrackingItem::new(None, at(9, 0)).with_start(at(23, 0)).is_ok());
    }

    #[test]
    fn open_item_measures_up_to_now() {
        let item = TimeTrackingItem::new(Some("coding".into()), at(9, 0));
        assert!(item.is_ongoing());
        assert_eq!(item.duration_until(at(11, 30)), TimeDelta::minutes(150));
    }

    #[test]
    fn open_item_in_the_future_has_no_duration() {
        let item = TimeTrackingItem::new(None, at(12, 0));
        assert_eq!(item.duration_until(at(11, 0)), TimeDelta::zero());
    }

    #[test]
    fn day_is_start_date() {
        let item = TimeTrackingItem::finished(None, at(23, 0), at(23, 59)).unwrap();
        assert_eq!(item.day(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }
}
