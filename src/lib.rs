mod consts;
mod prelude;
mod range;
mod resolver;
#[cfg(test)]
mod test_utils;
mod types;

pub use consts::*;
pub use range::{CandidateRange, DateRange, RangeError, calendar_day_distance};
pub use resolver::{Clock, DateRangeResolver, FixedClock, ResolverConfig, SystemClock};
pub use types::{DateFormat, DateInput, DateRangeInput, Gap, ParsedDate};

use crate::prelude::*;

/// Failure to read a date string. Never escapes `resolve`; see `ParsedDate::Invalid`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Resolves `input` against the wall clock with the default date format.
///
/// Missing ends default to `now - gap` and `now`. If the result is not an ordered range
/// spanning at most two calendar days, `(now - gap, now)` is returned instead.
pub fn resolve_date_range(input: &DateRangeInput, gap: Gap) -> DateRange {
    DateRangeResolver::new(ResolverConfig::default()).resolve_with_gap(input, gap)
}

/// True iff both ends are well-formed, `from < to`, and `extra` holds.
pub fn is_valid_date_range(range: &CandidateRange, extra: bool) -> bool {
    range.is_valid(extra)
}

/// `is_valid_date_range` with the ends at most two calendar days apart.
pub fn is_valid_date_range_in_two_days(range: &CandidateRange) -> bool {
    range.is_valid_within_two_days()
}
