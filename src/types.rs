use crate::consts::{DATE_FORMAT, DATE_PATTERNS, DATE_TIME_PATTERNS, DEFAULT_GAP_MS, TIME_PATTERNS};
use crate::{ParseError, prelude::*};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Length of the fallback window in milliseconds.
/// The default window covers the last `DEFAULT_GAP_MS` (5 minutes).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize,
)]
#[display(fmt = "{_0}ms")]
#[serde(transparent)]
pub struct Gap(u64);

impl Gap {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the gap as milliseconds
    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Converts to a signed chrono duration, saturating at `i64::MAX` milliseconds
    pub fn to_duration(self) -> Duration {
        Duration::milliseconds(i64::try_from(self.0).unwrap_or(i64::MAX))
    }
}

impl Default for Gap {
    fn default() -> Self {
        Self(DEFAULT_GAP_MS)
    }
}

impl From<std::time::Duration> for Gap {
    fn from(duration: std::time::Duration) -> Self {
        Self(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

/// One end of a requested range: either the raw query string or an already concrete timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, From)]
pub enum DateInput {
    Text(String),
    Date(NaiveDateTime),
}

impl DateInput {
    /// Blank text is treated the same as a missing value
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Date(_) => false,
        }
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl Serialize for DateInput {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Date(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
        }
    }
}

impl<'de> Deserialize<'de> for DateInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Query parameters always arrive as text; parsing is deferred to the resolver.
        String::deserialize(deserializer).map(Self::Text)
    }
}

/// The user-supplied `from`/`to` pair. Either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRangeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to:   Option<DateInput>,
}

impl DateRangeInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_from(mut self, from: impl Into<DateInput>) -> Self {
        self.from = Some(from.into());
        self
    }

    #[must_use]
    pub fn with_to(mut self, to: impl Into<DateInput>) -> Self {
        self.to = Some(to.into());
        self
    }
}

/// Outcome of parsing one end of a range.
/// Unparseable input becomes `Invalid` instead of an error so validation can reject it later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsedDate {
    Valid(NaiveDateTime),
    Invalid { input: String },
}

impl ParsedDate {
    /// Parses `input` with `format`, using `reference` to fill in a missing date
    pub fn parse(input: &str, format: &DateFormat, reference: NaiveDateTime) -> Self {
        format
            .parse(input, reference)
            .map_or_else(|_| Self::Invalid { input: input.to_owned() }, Self::Valid)
    }

    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the timestamp if well-formed
    pub const fn value(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Valid(value) => Some(*value),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<NaiveDateTime> for ParsedDate {
    fn from(value: NaiveDateTime) -> Self {
        Self::Valid(value)
    }
}

/// The fixed set of strftime patterns accepted for string input.
///
/// Patterns are tried in order: full date-times first, then bare dates (midnight),
/// then bare times (placed on the reference date).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormat {
    pub date_time: Vec<String>,
    pub date:      Vec<String>,
    pub time:      Vec<String>,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            date_time: DATE_TIME_PATTERNS.iter().map(|p| (*p).to_owned()).collect(),
            date:      DATE_PATTERNS.iter().map(|p| (*p).to_owned()).collect(),
            time:      TIME_PATTERNS.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
}

impl DateFormat {
    /// A format that accepts exactly one full date-time pattern and nothing partial
    pub fn strict(pattern: impl Into<String>) -> Self {
        Self {
            date_time: vec![pattern.into()],
            date:      Vec::new(),
            time:      Vec::new(),
        }
    }

    /// The pattern used for output, the first date-time pattern
    pub fn primary(&self) -> &str {
        self.date_time.first().map_or(DATE_FORMAT, String::as_str)
    }

    /// Renders `value` with the primary pattern
    pub fn format(&self, value: NaiveDateTime) -> String {
        value.format(self.primary()).to_string()
    }

    /// Parses `input`, taking the calendar date from `reference` when only a time is given.
    ///
    /// # Errors
    /// Returns `ParseError::EmptyInput` for blank input and `ParseError::InvalidFormat`
    /// when no pattern matches.
    pub fn parse(&self, input: &str, reference: NaiveDateTime) -> Result<NaiveDateTime, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        self.date_time
            .iter()
            .find_map(|p| NaiveDateTime::parse_from_str(trimmed, p).ok())
            .or_else(|| {
                self.date
                    .iter()
                    .find_map(|p| NaiveDate::parse_from_str(trimmed, p).ok())
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .or_else(|| {
                self.time
                    .iter()
                    .find_map(|p| NaiveTime::parse_from_str(trimmed, p).ok())
                    .map(|time| reference.date().and_time(time))
            })
            .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))
    }
}
