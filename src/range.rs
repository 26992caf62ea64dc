use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{DATE_FORMAT, Gap, MAX_DAY_SPAN, ParsedDate, prelude::*};

/// A concrete query window.
/// Only ranges that passed validation are guaranteed to satisfy `from < to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}/{}", "from.format(DATE_FORMAT)", "to.format(DATE_FORMAT)")]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to:   NaiveDateTime,
}

/// Reason a candidate range was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start could not be parsed.
    #[error("Invalid range start: {input:?}")]
    InvalidFrom { input: String },

    /// End could not be parsed.
    #[error("Invalid range end: {input:?}")]
    InvalidTo { input: String },

    /// Start is not strictly before end.
    #[error("Invalid date range: from ({from}) is not before to ({to})")]
    NotOrdered { from: NaiveDateTime, to: NaiveDateTime },

    /// Range covers too many calendar days.
    #[error("Date range spans {days} days (at most {max} allowed)")]
    SpanExceeded { days: i64, max: i64 },
}

/// Whole calendar days between the dates of `from` and `to`.
/// Times of day are ignored, so 23:59 to 00:01 the next day is one day.
pub fn calendar_day_distance(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    to.date().signed_duration_since(from.date()).num_days()
}

impl DateRange {
    pub const fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    /// The default window `(now - gap, now)`.
    /// Saturates at the earliest representable timestamp.
    pub fn fallback(now: NaiveDateTime, gap: Gap) -> Self {
        let from = now
            .checked_sub_signed(gap.to_duration())
            .unwrap_or(NaiveDateTime::MIN);
        Self { from, to: now }
    }

    /// Elapsed time from start to end (negative if reversed)
    pub fn duration(&self) -> Duration {
        self.to.signed_duration_since(self.from)
    }

    /// Absolute calendar-day distance between the ends
    pub fn day_span(&self) -> i64 {
        calendar_day_distance(self.from, self.to).abs()
    }
}

/// A `from`/`to` pair straight out of parsing; either end may still be invalid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateRange {
    pub from: ParsedDate,
    pub to:   ParsedDate,
}

impl CandidateRange {
    pub const fn new(from: ParsedDate, to: ParsedDate) -> Self {
        Self { from, to }
    }

    /// Checks that both ends are well-formed and `from < to`.
    ///
    /// # Errors
    /// Returns `InvalidFrom`/`InvalidTo` for unparsed ends and `NotOrdered` when `from >= to`.
    pub fn check_order(&self) -> Result<DateRange, RangeError> {
        let from = match &self.from {
            ParsedDate::Valid(value) => *value,
            ParsedDate::Invalid { input } => return Err(RangeError::InvalidFrom { input: input.clone() }),
        };
        let to = match &self.to {
            ParsedDate::Valid(value) => *value,
            ParsedDate::Invalid { input } => return Err(RangeError::InvalidTo { input: input.clone() }),
        };

        if from >= to {
            return Err(RangeError::NotOrdered { from, to });
        }
        Ok(DateRange::new(from, to))
    }

    /// Like `check_order`, and additionally limits the calendar-day distance to `max_day_span`.
    ///
    /// # Errors
    /// Returns `SpanExceeded` when the ends are more than `max_day_span` calendar days apart,
    /// or any error from `check_order`.
    pub fn check(&self, max_day_span: i64) -> Result<DateRange, RangeError> {
        let range = self.check_order()?;
        let days = range.day_span();
        if days > max_day_span {
            return Err(RangeError::SpanExceeded { days, max: max_day_span });
        }
        Ok(range)
    }

    /// Absolute calendar-day distance, if both ends are well-formed
    pub fn day_distance(&self) -> Option<i64> {
        Some(calendar_day_distance(self.from.value()?, self.to.value()?).abs())
    }

    /// True iff both ends are well-formed, `from < to`, and `extra_condition` holds.
    pub fn is_valid(&self, extra_condition: bool) -> bool {
        self.check_order().is_ok() && extra_condition
    }

    /// `is_valid` with the extra condition that the ends are at most two calendar days apart.
    pub fn is_valid_within_two_days(&self) -> bool {
        let within = self.day_distance().is_some_and(|days| days <= MAX_DAY_SPAN);
        self.is_valid(within)
    }
}

impl From<DateRange> for CandidateRange {
    fn from(range: DateRange) -> Self {
        Self {
            from: ParsedDate::Valid(range.from),
            to:   ParsedDate::Valid(range.to),
        }
    }
}
