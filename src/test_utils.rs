//! Shared fixtures for unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{CandidateRange, DateRangeResolver, FixedClock, ParsedDate, ResolverConfig};

pub fn date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .expect("test date-time out of range")
}

/// The fixed "now" used across tests: 2024-01-03 12:00:00
pub fn reference() -> NaiveDateTime {
    date_time(2024, 1, 3, 12, 0, 0)
}

pub fn resolver_at(now: NaiveDateTime) -> DateRangeResolver<FixedClock> {
    DateRangeResolver::with_clock(ResolverConfig::default(), FixedClock::new(now))
}

pub fn candidate(from: NaiveDateTime, to: NaiveDateTime) -> CandidateRange {
    CandidateRange::new(from.into(), to.into())
}

pub fn invalid(input: &str) -> ParsedDate {
    ParsedDate::Invalid {
        input: input.to_owned(),
    }
}
