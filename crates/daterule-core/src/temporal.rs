//! Canonical temporal value -- a zone-aware point in time with truncation.
//!
//! Wraps `chrono` + `chrono-tz` to provide the value type every rule operates
//! on: ISO-8601 parsing, zone reassignment, start-of/end-of period truncation,
//! and instant-based ordering. Parsing is total -- malformed text yields
//! `None`, never a panic.

use crate::error::{Result, SchemaError};
use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Calendar unit for start-of/end-of truncation.
///
/// Weeks start on Monday. `end_of` lands on the last millisecond of the
/// period (e.g. 23:59:59.999 for [`Unit::Day`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Year => "year",
            Unit::Quarter => "quarter",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "year" => Ok(Unit::Year),
            "quarter" => Ok(Unit::Quarter),
            "month" => Ok(Unit::Month),
            "week" => Ok(Unit::Week),
            "day" => Ok(Unit::Day),
            "hour" => Ok(Unit::Hour),
            "minute" => Ok(Unit::Minute),
            "second" => Ok(Unit::Second),
            other => Err(SchemaError::InvalidUnit(other.to_string())),
        }
    }
}

/// An immutable, zone-aware point in time.
///
/// Ordering and equality compare the **instant** -- two values in different
/// zones are equal when they name the same moment. The zone only matters for
/// wall-clock operations (truncation) and formatting. `granularity` records
/// the truncation unit last applied, if any.
#[derive(Debug, Clone, Copy)]
pub struct Temporal {
    datetime: DateTime<Tz>,
    granularity: Option<Unit>,
}

impl Temporal {
    /// Parse ISO-8601 text into a temporal value.
    ///
    /// Accepts offset-carrying forms (`2024-01-15T10:00:00Z`,
    /// `2024-01-15T10:00:00+02:00`), zoneless datetimes
    /// (`2024-01-15T10:00:00`, with optional fractional seconds), and bare
    /// dates (`2024-01-15`, midnight). Zoneless forms are interpreted as UTC
    /// wall-clock time. Returns `None` for anything else.
    pub fn parse_iso(text: &str) -> Option<Temporal> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Offset-carrying forms first. The offset fixes the instant; the
        // zone normalizes to UTC until a zone flag reassigns it.
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(Temporal {
                datetime: dt.with_timezone(&Tz::UTC),
                granularity: None,
            });
        }

        let naive = parse_naive(trimmed)?;
        Some(Temporal {
            datetime: Tz::UTC.from_utc_datetime(&naive),
            granularity: None,
        })
    }

    /// Wrap a UTC instant.
    pub fn from_utc(instant: DateTime<Utc>) -> Temporal {
        Temporal {
            datetime: instant.with_timezone(&Tz::UTC),
            granularity: None,
        }
    }

    /// Wrap an already zone-aware datetime.
    pub fn from_datetime(datetime: DateTime<Tz>) -> Temporal {
        Temporal {
            datetime,
            granularity: None,
        }
    }

    pub fn datetime(&self) -> DateTime<Tz> {
        self.datetime
    }

    pub fn zone(&self) -> Tz {
        self.datetime.timezone()
    }

    /// The same moment as a UTC instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.datetime.with_timezone(&Utc)
    }

    /// Truncation unit last applied by [`start_of`](Self::start_of) or
    /// [`end_of`](Self::end_of), if any.
    pub fn granularity(&self) -> Option<Unit> {
        self.granularity
    }

    /// Reassign the zone, keeping the instant (the wall clock moves).
    pub fn set_zone(&self, zone: Tz) -> Temporal {
        Temporal {
            datetime: self.datetime.with_timezone(&zone),
            granularity: self.granularity,
        }
    }

    /// Truncate down to the start of `unit` in the value's own zone.
    pub fn start_of(&self, unit: Unit) -> Temporal {
        let truncated = truncate_down(self.datetime.naive_local(), unit);
        Temporal {
            datetime: from_local(self.zone(), truncated),
            granularity: Some(unit),
        }
    }

    /// Truncate up to the end of `unit` (last millisecond of the period) in
    /// the value's own zone.
    pub fn end_of(&self, unit: Unit) -> Temporal {
        let start = truncate_down(self.datetime.naive_local(), unit);
        let end = next_period(start, unit) - Duration::milliseconds(1);
        Temporal {
            datetime: from_local(self.zone(), end),
            granularity: Some(unit),
        }
    }

    /// ISO-8601 text with millisecond precision and offset, e.g.
    /// `2024-01-15T00:00:00.000+00:00`.
    pub fn to_iso(&self) -> String {
        self.datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

// Comparisons are on the instant; zone and granularity never participate.
impl PartialEq for Temporal {
    fn eq(&self, other: &Self) -> bool {
        self.datetime == other.datetime
    }
}

impl Eq for Temporal {}

impl PartialOrd for Temporal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Temporal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.datetime.cmp(&other.datetime)
    }
}

impl Serialize for Temporal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for Temporal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Temporal::parse_iso(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO 8601 datetime: {text}")))
    }
}

/// Parse zoneless ISO forms: full datetime, minute-precision datetime, bare date.
fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Interpret a wall-clock time in `zone`, resolving DST edge cases: the
/// earlier of two ambiguous readings wins, and a time inside a DST gap is
/// advanced until the clock exists again.
fn from_local(zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = local;
            loop {
                probe = probe + Duration::minutes(15);
                match zone.from_local_datetime(&probe) {
                    LocalResult::Single(dt) => break dt,
                    LocalResult::Ambiguous(earliest, _) => break earliest,
                    LocalResult::None => continue,
                }
            }
        }
    }
}

fn truncate_down(local: NaiveDateTime, unit: Unit) -> NaiveDateTime {
    let date = local.date();
    let time = local.time();
    match unit {
        Unit::Second => date.and_time(hms(time.hour(), time.minute(), time.second())),
        Unit::Minute => date.and_time(hms(time.hour(), time.minute(), 0)),
        Unit::Hour => date.and_time(hms(time.hour(), 0, 0)),
        Unit::Day => date.and_time(NaiveTime::MIN),
        Unit::Week => {
            let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            monday.and_time(NaiveTime::MIN)
        }
        Unit::Month => first_of_month(date.year(), date.month()).and_time(NaiveTime::MIN),
        Unit::Quarter => {
            let month = ((date.month() - 1) / 3) * 3 + 1;
            first_of_month(date.year(), month).and_time(NaiveTime::MIN)
        }
        Unit::Year => first_of_month(date.year(), 1).and_time(NaiveTime::MIN),
    }
}

/// Start of the period immediately after `start` (which must itself be a
/// period start for `unit`).
fn next_period(start: NaiveDateTime, unit: Unit) -> NaiveDateTime {
    match unit {
        Unit::Second => start + Duration::seconds(1),
        Unit::Minute => start + Duration::minutes(1),
        Unit::Hour => start + Duration::hours(1),
        Unit::Day => start + Duration::days(1),
        Unit::Week => start + Duration::days(7),
        Unit::Month => start.checked_add_months(Months::new(1)).unwrap_or(start),
        Unit::Quarter => start.checked_add_months(Months::new(3)).unwrap_or(start),
        Unit::Year => start.checked_add_months(Months::new(12)).unwrap_or(start),
    }
}

fn hms(hour: u32, minute: u32, second: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}
