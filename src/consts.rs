/// Application-wide date format (strftime syntax) for `from`/`to` strings
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-time patterns accepted for string input, tried in order.
/// The first entry is always `DATE_FORMAT`; the rest drop trailing components.
pub const DATE_TIME_PATTERNS: [&str; 2] = [DATE_FORMAT, "%Y-%m-%d %H:%M"];

/// Date-only patterns, resolved to midnight
pub const DATE_PATTERNS: [&str; 1] = ["%Y-%m-%d"];

/// Time-only patterns, resolved against the reference date
pub const TIME_PATTERNS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Default fallback gap: 5 minutes
pub const DEFAULT_GAP_MS: u64 = 5 * 60 * 1000;

/// Largest calendar-day distance a range may span
pub const MAX_DAY_SPAN: i64 = 2;
