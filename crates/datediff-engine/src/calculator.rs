//! Date difference computation.
//!
//! [`DiffCalculator::calculate`] takes two datetime strings and a unit name and
//! returns the elapsed time between them in that unit as a single integer.
//! Inputs are validated before any arithmetic happens, so malformed input
//! always surfaces as a validation error and never as a calendar fault.
//!
//! # Units
//!
//! | unit | result |
//! |---|---|
//! | `days` | whole days elapsed |
//! | `weekdays` | Monday–Friday days, see [`count_weekdays`] |
//! | `weeks` | whole days / 7, floored |
//! | `hours` / `minutes` / `seconds` | total elapsed time in that unit, truncated |
//! | `years` | complete calendar years |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};
use crate::parse::{DateTimeParser, ParsedDateTime};

const SECONDS_PER_DAY: i64 = 86_400;

// ── CalculationType ─────────────────────────────────────────────────────────

/// The unit a difference is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationType {
    Days,
    Weekdays,
    Weeks,
    Hours,
    Minutes,
    Seconds,
    Years,
}

impl CalculationType {
    /// Every supported unit, in the order they are listed to callers.
    pub const ALL: [CalculationType; 7] = [
        CalculationType::Days,
        CalculationType::Weekdays,
        CalculationType::Weeks,
        CalculationType::Seconds,
        CalculationType::Minutes,
        CalculationType::Hours,
        CalculationType::Years,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CalculationType::Days => "days",
            CalculationType::Weekdays => "weekdays",
            CalculationType::Weeks => "weeks",
            CalculationType::Hours => "hours",
            CalculationType::Minutes => "minutes",
            CalculationType::Seconds => "seconds",
            CalculationType::Years => "years",
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: only the lower-case unit names are accepted.
impl FromStr for CalculationType {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self> {
        CalculationType::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or(DiffError::InvalidCalculationType)
    }
}

// ── Interval ────────────────────────────────────────────────────────────────

/// Civil difference between two ordered instants.
///
/// Both instants are read on a common wall clock: the local time of their
/// shared named zone, else of their shared offset, else UTC. `days`, `hours`,
/// `minutes` and `seconds` decompose the difference of those readings (hours
/// 0-23, minutes and seconds 0-59) and `years` counts complete calendar years
/// on the same clock. A span across a DST change in one zone therefore counts
/// calendar days, not 86 400-second blocks of absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub years: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Interval {
    /// Compute the interval from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::EndBeforeStart`] if `end` is earlier than `start`.
    pub fn between(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> Result<Self> {
        let fixed = |instant: &DateTime<FixedOffset>| ParsedDateTime {
            instant: *instant,
            zone: None,
        };
        Self::between_parsed(&fixed(start), &fixed(end))
    }

    /// Like [`between`](Self::between), but reads instants resolved in the
    /// same named zone on that zone's wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::EndBeforeStart`] if `end` is earlier than `start`.
    pub fn between_parsed(start: &ParsedDateTime, end: &ParsedDateTime) -> Result<Self> {
        if end.instant < start.instant {
            return Err(DiffError::EndBeforeStart);
        }

        let (from, to) = wall_clock_frame(start, end);
        let total_seconds = (to - from).num_seconds();

        let days = total_seconds / SECONDS_PER_DAY;
        let remainder = total_seconds % SECONDS_PER_DAY;
        let hours = remainder / 3600;
        let remainder = remainder % 3600;
        let minutes = remainder / 60;
        let seconds = remainder % 60;

        Ok(Interval {
            years: civil_years(from, to),
            days,
            hours,
            minutes,
            seconds,
        })
    }

    pub fn weeks(&self) -> i64 {
        self.days / 7
    }

    pub fn total_hours(&self) -> i64 {
        self.days * 24 + self.hours
    }

    pub fn total_minutes(&self) -> i64 {
        self.total_hours() * 60 + self.minutes
    }

    pub fn total_seconds(&self) -> i64 {
        self.total_minutes() * 60 + self.seconds
    }
}

/// Wall-clock readings of `start` and `end` in their common frame.
///
/// Falls back to UTC when no zone or offset is shared, or when the local
/// clock runs backwards across a repeated fall-back hour.
fn wall_clock_frame(start: &ParsedDateTime, end: &ParsedDateTime) -> (NaiveDateTime, NaiveDateTime) {
    if start.shares_zone_with(end) || start.instant.offset() == end.instant.offset() {
        let (from, to) = (start.instant.naive_local(), end.instant.naive_local());
        if to >= from {
            return (from, to);
        }
    }
    (start.instant.naive_utc(), end.instant.naive_utc())
}

/// Complete calendar years from `from` to `to`.
fn civil_years(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let mut years = i64::from(to.year() - from.year());
    if (to.month(), to.day(), to.time()) < (from.month(), from.day(), from.time()) {
        years -= 1;
    }
    years.max(0)
}

// ── Weekday counting ────────────────────────────────────────────────────────

/// Count Monday–Friday days in a span of `total_days` starting on `start_day`.
///
/// Each complete week contributes five weekdays. The leftover days are scanned
/// forward from `start_day` itself, so the result depends on which weekday the
/// span starts on, not where it ends.
///
/// # Errors
///
/// Returns [`DiffError::Calendar`] if the scan walks past the last
/// representable date.
pub fn count_weekdays(start_day: NaiveDate, total_days: i64) -> Result<i64> {
    let complete_weeks = total_days / 7;
    let remaining_days = total_days % 7;

    let mut weekdays = complete_weeks * 5;
    for offset in 0..remaining_days.unsigned_abs() {
        let day = start_day.checked_add_days(Days::new(offset)).ok_or_else(|| {
            DiffError::Calendar(format!("{start_day} + {offset} days is out of range"))
        })?;
        if is_weekday(day.weekday()) {
            weekdays += 1;
        }
    }

    Ok(weekdays)
}

fn is_weekday(day: Weekday) -> bool {
    day.number_from_monday() <= 5
}

// ── DiffCalculator ──────────────────────────────────────────────────────────

/// The value produced by a successful calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffResult {
    pub result: i64,
}

impl From<DiffResult> for i64 {
    fn from(value: DiffResult) -> Self {
        value.result
    }
}

/// Computes differences between two datetime strings.
///
/// Holds no mutable state; one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffCalculator {
    parser: DateTimeParser,
}

impl DiffCalculator {
    /// A calculator that resolves zone-less dates in UTC.
    pub fn new() -> Self {
        Self::default()
    }

    /// A calculator that resolves zone-less dates in `tz`.
    pub fn with_default_timezone(tz: Tz) -> Self {
        Self::with_parser(DateTimeParser::new(tz))
    }

    pub fn with_parser(parser: DateTimeParser) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &DateTimeParser {
        &self.parser
    }

    /// Compute the difference between `start_date` and `end_date` in the unit
    /// named by `calculation_type`.
    ///
    /// # Errors
    ///
    /// Validation runs in this order, the first failure wins:
    ///
    /// 1. [`DiffError::InvalidStartDate`] if `start_date` does not parse
    /// 2. [`DiffError::InvalidEndDate`] if `end_date` does not parse
    /// 3. [`DiffError::InvalidCalculationType`] if the unit is unknown
    ///    (matching is case-sensitive)
    /// 4. [`DiffError::EndBeforeStart`] if `end_date` is earlier than `start_date`
    ///
    /// # Examples
    ///
    /// ```
    /// use datediff_engine::DiffCalculator;
    ///
    /// let calc = DiffCalculator::new();
    /// let diff = calc
    ///     .calculate("2024-01-01T00:00:00+00:00", "2024-01-10T00:00:00+00:00", "weekdays")
    ///     .unwrap();
    /// assert_eq!(diff.result, 7);
    /// ```
    pub fn calculate(
        &self,
        start_date: &str,
        end_date: &str,
        calculation_type: &str,
    ) -> Result<DiffResult> {
        let (start, end, unit) = self
            .validate_inputs(start_date, end_date, calculation_type)
            .inspect_err(|e| tracing::debug!(error = %e, "rejected date difference input"))?;

        let interval = Interval::between_parsed(&start, &end)?;

        let result = match unit {
            CalculationType::Days => interval.days,
            CalculationType::Weekdays => count_weekdays(start.instant.date_naive(), interval.days)?,
            CalculationType::Weeks => interval.weeks(),
            CalculationType::Hours => interval.total_hours(),
            CalculationType::Minutes => interval.total_minutes(),
            CalculationType::Seconds => interval.total_seconds(),
            CalculationType::Years => interval.years,
        };

        tracing::debug!(unit = %unit, result, "computed date difference");
        Ok(DiffResult { result })
    }

    fn validate_inputs(
        &self,
        start_date: &str,
        end_date: &str,
        calculation_type: &str,
    ) -> Result<(ParsedDateTime, ParsedDateTime, CalculationType)> {
        let start = self
            .parser
            .parse_zoned(start_date)
            .ok_or(DiffError::InvalidStartDate)?;
        let end = self
            .parser
            .parse_zoned(end_date)
            .ok_or(DiffError::InvalidEndDate)?;
        let unit = calculation_type.parse::<CalculationType>()?;

        if end.instant < start.instant {
            return Err(DiffError::EndBeforeStart);
        }

        Ok((start, end, unit))
    }
}

/// Compute a difference with a UTC-defaulting [`DiffCalculator`].
///
/// See [`DiffCalculator::calculate`].
pub fn calculate(start_date: &str, end_date: &str, calculation_type: &str) -> Result<DiffResult> {
    DiffCalculator::new().calculate(start_date, end_date, calculation_type)
}

// ── Tests ───────────────────────────────────────────────────────────────────
