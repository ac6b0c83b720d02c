//! Datetime string parsing.
//!
//! Turns the loosely formatted timestamps callers send (ISO 8601, RFC 3339,
//! RFC 2822, RFC 850, bare dates, dates with a trailing IANA zone name) into
//! absolute instants. Strings without any offset or zone are resolved in the
//! parser's default timezone.
//!
//! Only absolute expressions are understood. Relative phrases such as
//! `"tomorrow"` would need a clock, and parsing stays a pure function of its
//! input.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Formats carrying a numeric UTC offset. `%z` accepts both `+0000` and `+00:00`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
    "%a, %d %b %y %H:%M:%S %z",
];

/// Formats without an offset. Two-digit year variants come first: `%Y` would
/// happily read `22` as the year 22.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%A, %d-%b-%y %H:%M:%S",
    "%A, %d-%b-%Y %H:%M:%S",
    "%a, %d %b %y %H:%M:%S",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed instant together with the named zone it was resolved in.
///
/// `zone` is `None` when the input carried its own numeric offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub instant: DateTime<FixedOffset>,
    pub zone: Option<Tz>,
}

impl ParsedDateTime {
    fn fixed(instant: DateTime<FixedOffset>) -> Self {
        Self { instant, zone: None }
    }

    /// Whether both instants were resolved in the same named zone.
    pub fn shares_zone_with(&self, other: &ParsedDateTime) -> bool {
        matches!((self.zone, other.zone), (Some(a), Some(b)) if a == b)
    }
}

/// Parses datetime strings into fixed-offset instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeParser {
    default_tz: Tz,
}

impl Default for DateTimeParser {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl DateTimeParser {
    /// Create a parser that resolves zone-less strings in `default_tz`.
    pub fn new(default_tz: Tz) -> Self {
        Self { default_tz }
    }

    /// The timezone used for strings without an offset or zone name.
    pub fn default_timezone(&self) -> Tz {
        self.default_tz
    }

    /// Parse `input` into an absolute instant.
    ///
    /// Returns `None` when the string cannot be resolved to a concrete
    /// instant, or when it resolves to the Unix epoch or earlier.
    ///
    /// # Examples
    ///
    /// ```
    /// use datediff_engine::parse::DateTimeParser;
    ///
    /// let parser = DateTimeParser::default();
    /// let dt = parser.parse("2022-06-02 16:58:35 Asia/Dubai").unwrap();
    /// assert_eq!(dt.to_rfc3339(), "2022-06-02T16:58:35+04:00");
    /// assert!(parser.parse("invalid-date").is_none());
    /// ```
    pub fn parse(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        self.parse_zoned(input).map(|parsed| parsed.instant)
    }

    /// Like [`parse`](Self::parse), but also reports the named zone the
    /// instant was resolved in.
    pub fn parse_zoned(&self, input: &str) -> Option<ParsedDateTime> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }

        try_rfc3339(s)
            .or_else(|| try_offset_formats(s))
            .or_else(|| try_hour_only_offset(s))
            .or_else(|| try_rfc2822(s))
            .map(ParsedDateTime::fixed)
            .or_else(|| try_zone_suffixed(s))
            .or_else(|| parse_naive(s).and_then(|naive| localize(self.default_tz, naive)))
            .filter(|parsed| parsed.instant.timestamp() > 0)
    }

    /// Whether `input` parses to a valid instant.
    pub fn is_valid(&self, input: &str) -> bool {
        self.parse(input).is_some()
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn try_rfc3339(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

fn try_offset_formats(s: &str) -> Option<DateTime<FixedOffset>> {
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
}

/// `...T00:00:00+05`: an offset with hours only, read as `+05:00`.
fn try_hour_only_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    let (head, offset) = s.split_at_checked(s.len().checked_sub(3)?)?;
    let (sign, hours) = offset.split_at_checked(1)?;
    if !matches!(sign, "+" | "-") || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{head}{offset}:00");
    try_rfc3339(&padded).or_else(|| try_offset_formats(&padded))
}

fn try_rfc2822(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(s).ok()
}

/// `"<datetime> <zone>"` where the zone is an IANA name, `UTC`, `GMT` or `Z`.
fn try_zone_suffixed(s: &str) -> Option<ParsedDateTime> {
    let (head, zone) = s.rsplit_once(char::is_whitespace)?;
    let tz = parse_zone_token(zone)?;
    let naive = parse_naive(head.trim_end())?;
    localize(tz, naive)
}

fn parse_zone_token(token: &str) -> Option<Tz> {
    match token {
        "Z" | "z" => Some(Tz::UTC),
        _ => token.parse::<Tz>().ok(),
    }
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Pin a wall-clock time to `tz`. Ambiguous times take the earlier instant;
/// times inside a DST gap move forward by the skipped hour.
fn localize(tz: Tz, naive: NaiveDateTime) -> Option<ParsedDateTime> {
    let resolved = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()?,
    };
    Some(ParsedDateTime {
        instant: resolved.fixed_offset(),
        zone: Some(tz),
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
