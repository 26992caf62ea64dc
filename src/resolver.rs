use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    CandidateRange, DateFormat, DateInput, DateRange, DateRangeInput, Gap, MAX_DAY_SPAN, ParsedDate,
    prelude::*,
};

/// Source of the current time. Read once per resolve call.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub const fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Settings a host application can load alongside its own configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Length of the fallback window
    pub gap:         Gap,
    /// Patterns accepted for string `from`/`to` values
    pub date_format: DateFormat,
}

/// Turns a user-supplied `from`/`to` pair into a usable query window.
///
/// Resolution never fails: anything that does not form an ordered range spanning
/// at most `MAX_DAY_SPAN` calendar days is replaced by `(now - gap, now)`.
#[derive(Debug, Clone, Default)]
pub struct DateRangeResolver<C = SystemClock> {
    config: ResolverConfig,
    clock:  C,
}

impl DateRangeResolver<SystemClock> {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> DateRangeResolver<C> {
    pub const fn with_clock(config: ResolverConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `input` using the configured gap
    pub fn resolve(&self, input: &DateRangeInput) -> DateRange {
        self.resolve_with_gap(input, self.config.gap)
    }

    /// Resolves `input`, falling back to the last `gap` if it is not a valid range
    pub fn resolve_with_gap(&self, input: &DateRangeInput, gap: Gap) -> DateRange {
        let now = self.clock.now();
        let fallback = DateRange::fallback(now, gap);
        let candidate = self.candidate(input, now, fallback);

        match candidate.check(MAX_DAY_SPAN) {
            Ok(range) => range,
            Err(reason) => {
                debug!(%reason, %fallback, "rejected requested date range, using default window");
                fallback
            }
        }
    }

    /// Parses both ends without validating them; missing ends take the `defaults` values
    pub fn candidate(&self, input: &DateRangeInput, now: NaiveDateTime, defaults: DateRange) -> CandidateRange {
        CandidateRange::new(
            self.parse_side(input.from.as_ref(), defaults.from, now),
            self.parse_side(input.to.as_ref(), defaults.to, now),
        )
    }

    fn parse_side(&self, value: Option<&DateInput>, default: NaiveDateTime, now: NaiveDateTime) -> ParsedDate {
        match value {
            None => ParsedDate::Valid(default),
            Some(input) if input.is_blank() => ParsedDate::Valid(default),
            Some(DateInput::Date(date)) => ParsedDate::Valid(*date),
            Some(DateInput::Text(text)) => ParsedDate::parse(text, &self.config.date_format, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date_time, reference, resolver_at};
    use chrono::Duration;

    fn fallback() -> DateRange {
        DateRange::fallback(reference(), Gap::default())
    }

    #[test]
    fn test_empty_input_uses_default_window() {
        let resolver = resolver_at(reference());
        let range = resolver.resolve(&DateRangeInput::new());
        assert_eq!(range.to, reference());
        assert_eq!(range.from, reference() - Duration::milliseconds(300_000));
    }

    #[test]
    fn test_resolve_cases() {
        struct TestCase {
            from:        Option<&'static str>,
            to:          Option<&'static str>,
            expected:    DateRange,
            description: &'static str,
        }

        let cases = [
            TestCase {
                from:        Some("2024-01-01 10:00"),
                to:          Some("2024-01-01 09:00"),
                expected:    fallback(),
                description: "to before from",
            },
            TestCase {
                from:        Some("2024-01-01"),
                to:          Some("2024-01-05"),
                expected:    fallback(),
                description: "four-day span",
            },
            TestCase {
                from:        Some("2024-01-01"),
                to:          Some("2024-01-02"),
                expected:    DateRange::new(date_time(2024, 1, 1, 0, 0, 0), date_time(2024, 1, 2, 0, 0, 0)),
                description: "one-day span kept",
            },
            TestCase {
                from:        Some("not-a-date"),
                to:          Some("2024-01-02"),
                expected:    fallback(),
                description: "unparseable start",
            },
            TestCase {
                from:        Some("2024-01-01 10:00"),
                to:          Some("2024-01-01 10:00"),
                expected:    fallback(),
                description: "empty range",
            },
            TestCase {
                from:        None,
                to:          Some("2024-01-03 13:00"),
                expected:    DateRange::new(date_time(2024, 1, 3, 11, 55, 0), date_time(2024, 1, 3, 13, 0, 0)),
                description: "missing start defaults to now - gap",
            },
            TestCase {
                from:        Some("2024-01-02 08:00:00"),
                to:          None,
                expected:    DateRange::new(date_time(2024, 1, 2, 8, 0, 0), reference()),
                description: "missing end defaults to now",
            },
            TestCase {
                from:        Some("2023-12-31"),
                to:          None,
                expected:    fallback(),
                description: "missing end makes the span too long",
            },
            TestCase {
                from:        Some("08:00"),
                to:          Some("09:30"),
                expected:    DateRange::new(date_time(2024, 1, 3, 8, 0, 0), date_time(2024, 1, 3, 9, 30, 0)),
                description: "times resolve against today",
            },
            TestCase {
                from:        Some(""),
                to:          Some(""),
                expected:    fallback(),
                description: "blank values count as missing",
            },
        ];

        let resolver = resolver_at(reference());
        for case in &cases {
            let mut input = DateRangeInput::new();
            input.from = case.from.map(DateInput::from);
            input.to = case.to.map(DateInput::from);
            assert_eq!(resolver.resolve(&input), case.expected, "Unexpected result for: {}", case.description);
        }
    }

    #[test]
    fn test_concrete_dates_pass_through() {
        let resolver = resolver_at(reference());
        let from = date_time(2024, 1, 2, 12, 0, 0);
        let to = date_time(2024, 1, 3, 11, 0, 0);
        let range = resolver.resolve(&DateRangeInput::new().with_from(from).with_to(to));
        assert_eq!(range, DateRange::new(from, to));

        let reversed = resolver.resolve(&DateRangeInput::new().with_from(to).with_to(from));
        assert_eq!(reversed, fallback());
    }

    #[test]
    fn test_custom_gap() {
        let resolver = resolver_at(reference());
        let gap = Gap::from_millis(60 * 60 * 1000);
        let range = resolver.resolve_with_gap(&DateRangeInput::new().with_from("bogus"), gap);
        assert_eq!(range, DateRange::new(date_time(2024, 1, 3, 11, 0, 0), reference()));
    }

    #[test]
    fn test_zero_gap_still_returns_a_pair() {
        let resolver = resolver_at(reference());
        let range = resolver.resolve_with_gap(&DateRangeInput::new(), Gap::from_millis(0));
        assert_eq!(range, DateRange::new(reference(), reference()));
    }

    #[test]
    fn test_configured_gap_and_format() {
        let config: ResolverConfig = serde_json::from_str(
            r#"{"gap": 600000, "date_format": {"date_time": ["%d.%m.%Y %H:%M"], "date": [], "time": []}}"#,
        )
        .unwrap();
        assert_eq!(config.gap, Gap::from_millis(600_000));

        let resolver = DateRangeResolver::with_clock(config, FixedClock::new(reference()));
        let range = resolver.resolve(
            &DateRangeInput::new()
                .with_from("02.01.2024 10:00")
                .with_to("02.01.2024 11:00"),
        );
        assert_eq!(range, DateRange::new(date_time(2024, 1, 2, 10, 0, 0), date_time(2024, 1, 2, 11, 0, 0)));

        // the default patterns are no longer accepted
        let range = resolver.resolve(&DateRangeInput::new().with_from("2024-01-02"));
        assert_eq!(range, DateRange::new(date_time(2024, 1, 3, 11, 50, 0), reference()));
    }

    #[test]
    fn test_config_defaults() {
        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.gap, Gap::default());
        assert_eq!(config.date_format, DateFormat::default());
    }

    #[test]
    fn test_candidate_keeps_invalid_markers() {
        let resolver = resolver_at(reference());
        let candidate = resolver.candidate(
            &DateRangeInput::new().with_from("not-a-date"),
            reference(),
            fallback(),
        );
        assert!(!candidate.from.is_valid());
        assert_eq!(candidate.to, ParsedDate::Valid(reference()));
    }

    #[test]
    fn test_clock_by_reference() {
        let clock = FixedClock::new(reference());
        let resolver = DateRangeResolver::with_clock(ResolverConfig::default(), &clock);
        assert_eq!(resolver.resolve(&DateRangeInput::new()), fallback());
    }
}
