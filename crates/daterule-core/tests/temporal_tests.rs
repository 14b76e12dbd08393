//! Tests for the canonical temporal value: ISO parsing, zone handling,
//! and start-of/end-of truncation.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use daterule_core::{Temporal, Unit};

/// Helper: parse ISO text that must be valid.
fn t(text: &str) -> Temporal {
    Temporal::parse_iso(text).expect("valid ISO text")
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_utc_suffix() {
    let value = t("2024-01-15T10:00:00Z");
    assert_eq!(value.instant(), Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
}

#[test]
fn parses_explicit_offset() {
    // 10:00 at +02:00 is 08:00 UTC
    let value = t("2024-01-15T10:00:00+02:00");
    assert_eq!(value.instant(), Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap());
}

#[test]
fn parses_zoneless_datetime_as_utc() {
    let value = t("2024-01-15T10:00:00");
    assert_eq!(value.instant(), Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
    assert_eq!(value.zone(), Tz::UTC);
}

#[test]
fn parses_fractional_seconds() {
    let value = t("2024-01-15T10:00:00.250");
    assert_eq!(value.to_iso(), "2024-01-15T10:00:00.250+00:00");
}

#[test]
fn parses_minute_precision() {
    let value = t("2024-01-15T10:30");
    assert_eq!(value.instant(), Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
}

#[test]
fn parses_bare_date_as_midnight() {
    let value = t("2024-01-15");
    assert_eq!(value.instant(), Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
}

#[test]
fn rejects_malformed_text() {
    assert!(Temporal::parse_iso("not-a-date").is_none());
    assert!(Temporal::parse_iso("2024-13-45").is_none());
    assert!(Temporal::parse_iso("15/01/2024").is_none());
    assert!(Temporal::parse_iso("").is_none());
    assert!(Temporal::parse_iso("   ").is_none());
}

// ---------------------------------------------------------------------------
// Zones and comparisons
// ---------------------------------------------------------------------------

#[test]
fn set_zone_keeps_the_instant() {
    let utc = t("2024-03-05T14:30:00Z");
    let tokyo = utc.set_zone(Tz::Asia__Tokyo);

    assert_eq!(tokyo.instant(), utc.instant());
    assert_eq!(tokyo.zone(), Tz::Asia__Tokyo);
    assert_eq!(tokyo.to_iso(), "2024-03-05T23:30:00.000+09:00");
}

#[test]
fn from_datetime_keeps_the_zone() {
    let dt = Tz::Asia__Tokyo
        .with_ymd_and_hms(2024, 3, 5, 23, 30, 0)
        .unwrap();
    let value = Temporal::from_datetime(dt);
    assert_eq!(value.zone(), Tz::Asia__Tokyo);
    assert_eq!(value, t("2024-03-05T14:30:00Z"));
}

#[test]
fn equality_ignores_zone() {
    let utc = t("2024-03-05T14:30:00Z");
    let tokyo = utc.set_zone(Tz::Asia__Tokyo);
    assert_eq!(utc, tokyo);
}

#[test]
fn ordering_compares_instants() {
    let earlier = t("2024-01-10");
    let later = t("2024-01-20");

    assert!(earlier < later);
    assert!(later > earlier);
    assert!(earlier <= t("2024-01-10"));
    assert!(earlier >= t("2024-01-10"));
}

// ---------------------------------------------------------------------------
// Truncation
// ---------------------------------------------------------------------------

#[test]
fn start_of_day() {
    let value = t("2024-03-05T14:30:00").start_of(Unit::Day);
    assert_eq!(value.to_iso(), "2024-03-05T00:00:00.000+00:00");
    assert_eq!(value.granularity(), Some(Unit::Day));
}

#[test]
fn end_of_day_is_last_millisecond() {
    let value = t("2024-03-05T14:30:00").end_of(Unit::Day);
    assert_eq!(value.to_iso(), "2024-03-05T23:59:59.999+00:00");
    assert_eq!(value.granularity(), Some(Unit::Day));
}

#[test]
fn start_of_week_is_monday() {
    // 2024-03-05 is a Tuesday
    let value = t("2024-03-05T14:30:00").start_of(Unit::Week);
    assert_eq!(value.to_iso(), "2024-03-04T00:00:00.000+00:00");
}

#[test]
fn start_of_month_and_year() {
    let value = t("2024-03-05T14:30:00");
    assert_eq!(value.start_of(Unit::Month).to_iso(), "2024-03-01T00:00:00.000+00:00");
    assert_eq!(value.start_of(Unit::Year).to_iso(), "2024-01-01T00:00:00.000+00:00");
}

#[test]
fn start_of_quarter() {
    assert_eq!(
        t("2024-05-20").start_of(Unit::Quarter).to_iso(),
        "2024-04-01T00:00:00.000+00:00"
    );
    assert_eq!(
        t("2024-12-31").start_of(Unit::Quarter).to_iso(),
        "2024-10-01T00:00:00.000+00:00"
    );
}

#[test]
fn end_of_month_handles_leap_year() {
    let value = t("2024-02-10T08:00:00").end_of(Unit::Month);
    assert_eq!(value.to_iso(), "2024-02-29T23:59:59.999+00:00");
}

#[test]
fn start_of_sub_day_units() {
    let value = t("2024-03-05T14:30:45.500");
    assert_eq!(value.start_of(Unit::Hour).to_iso(), "2024-03-05T14:00:00.000+00:00");
    assert_eq!(value.start_of(Unit::Minute).to_iso(), "2024-03-05T14:30:00.000+00:00");
    assert_eq!(value.start_of(Unit::Second).to_iso(), "2024-03-05T14:30:45.000+00:00");
}

#[test]
fn truncation_runs_in_the_values_zone() {
    // 15:00 UTC on 2024-03-10 is 11:00 EDT; midnight that day in New York
    // is still EST (the DST jump happens at 2 AM local).
    let value = t("2024-03-10T15:00:00Z")
        .set_zone(Tz::America__New_York)
        .start_of(Unit::Day);
    assert_eq!(value.to_iso(), "2024-03-10T00:00:00.000-05:00");
}

// ---------------------------------------------------------------------------
// Formatting and serde
// ---------------------------------------------------------------------------

#[test]
fn iso_roundtrip_preserves_the_instant() {
    let value = t("2024-03-05T14:30:00.123+05:30");
    let reparsed = t(&value.to_iso());
    assert_eq!(value, reparsed);
}

#[test]
fn serializes_as_iso_text() {
    let json = serde_json::to_string(&t("2024-01-15")).unwrap();
    assert_eq!(json, "\"2024-01-15T00:00:00.000+00:00\"");
}

#[test]
fn deserializes_from_iso_text() {
    let value: Temporal = serde_json::from_str("\"2024-01-15T10:00:00Z\"").unwrap();
    assert_eq!(value, t("2024-01-15T10:00:00Z"));
}

#[test]
fn deserialize_rejects_malformed_text() {
    let result: Result<Temporal, _> = serde_json::from_str("\"yesterday\"");
    assert!(result.is_err());
}

#[test]
fn unit_parses_from_text() {
    assert_eq!("day".parse::<Unit>().unwrap(), Unit::Day);
    assert_eq!("quarter".parse::<Unit>().unwrap(), Unit::Quarter);
    assert!("fortnight".parse::<Unit>().is_err());
}
