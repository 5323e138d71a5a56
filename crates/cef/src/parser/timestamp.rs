//! Timestamp: epoch and textual date parsing for timestamp-typed extensions.
//!
//! CEF allows either milliseconds since the epoch (`rt=1423441663000`) or a
//! textual form `MMM dd [yyyy] HH:mm:ss[.SSS][ zzz]` (`rt=Feb 09 2015 00:27:43 UTC`).
//! A value without any `:` is always treated as epoch milliseconds.

use std::sync::LazyLock;
use chrono::{
    DateTime, Datelike, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use regex::Regex;
use thiserror::Error;

use super::locale::Locale;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Invalid epoch milliseconds: {0}")]
    InvalidEpoch(String),

    #[error("Unrecognized date format: {0}")]
    UnrecognizedFormat(String),

    #[error("Unknown month '{month}' for locale {locale}")]
    UnknownMonth { month: String, locale: Locale },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<month>\S+)\s(?P<day>[0-9]{2})\s(?:(?P<year>[0-9]{4})\s)?",
        r"(?P<hour>[012][0-9]):(?P<minute>[0-5][0-9]):(?P<second>[0-5][0-9])",
        r"(?:\.(?P<milli>[0-9]{3}))?",
        r"(?:\s(?P<tz>[A-Za-z]+|[+-][0-9]{2}:?[0-9]{2}))?$",
    ))
    .expect("timestamp pattern is valid")
});

/// Timezone abbreviations accepted after the time of day, in offset minutes.
const TZ_ABBREVIATIONS: &[(&str, i32)] = &[
    ("UTC", 0), ("GMT", 0), ("UT", 0), ("Z", 0),
    ("WET", 0), ("WEST", 60), ("BST", 60),
    ("CET", 60), ("CEST", 120), ("MET", 60), ("MEST", 120),
    ("EET", 120), ("EEST", 180), ("MSK", 180),
    ("IST", 330), ("HKT", 480), ("SGT", 480), ("AWST", 480),
    ("JST", 540), ("KST", 540), ("ACST", 570),
    ("AEST", 600), ("AEDT", 660), ("NZST", 720), ("NZDT", 780),
    ("HST", -600), ("AKST", -540), ("AKDT", -480),
    ("PST", -480), ("PDT", -420), ("MST", -420), ("MDT", -360),
    ("CST", -360), ("CDT", -300), ("EST", -300), ("EDT", -240),
];

/// Parse a timestamp extension value into an absolute instant.
///
/// Without an explicit year the current local year is assumed, and without
/// a timezone the wall-clock time is read in the process's local timezone.
pub fn parse_timestamp(value: &str, locale: Locale) -> Result<DateTime<Utc>, TimestampError> {
    if !value.contains(':') {
        // Any i64 is accepted syntactically, but only instants chrono can
        // represent (about ±262,000 years) resolve; the rest are OutOfRange.
        let millis: i64 = value
            .parse()
            .map_err(|_| TimestampError::InvalidEpoch(value.to_string()))?;
        return DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| TimestampError::OutOfRange(value.to_string()));
    }

    let caps = TIME_PATTERN
        .captures(value)
        .ok_or_else(|| TimestampError::UnrecognizedFormat(value.to_string()))?;

    let month_token = &caps["month"];
    let month = locale
        .month_number(month_token)
        .ok_or_else(|| TimestampError::UnknownMonth { month: month_token.to_string(), locale })?;

    let number = |name: &str| -> Result<u32, TimestampError> {
        caps.name(name)
            .map_or(Ok(0), |m| m.as_str().parse())
            .map_err(|_| TimestampError::UnrecognizedFormat(value.to_string()))
    };

    let year = match caps.name("year") {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| TimestampError::UnrecognizedFormat(value.to_string()))?,
        None => Local::now().year(),
    };

    let (day, hour, minute, second, milli) = (
        number("day")?,
        number("hour")?,
        number("minute")?,
        number("second")?,
        number("milli")?,
    );

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, milli))
        .ok_or_else(|| TimestampError::OutOfRange(value.to_string()))?;

    Ok(match caps.name("tz") {
        Some(tz) => local_to_utc(&resolve_timezone(tz.as_str())?, naive),
        None => local_to_utc(&Local, naive),
    })
}

/// Read a wall-clock time in `tz`.
///
/// Ambiguous times (backward DST transition) take the earlier instant. Times
/// skipped by a forward transition are read with the offset in effect before
/// it, which moves them forward by the length of the gap.
fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(naive - TimeDelta::days(1))).fix();
            with_offset(naive, before)
        }
    }
}

fn with_offset(naive: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    let utc = naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc)
}

/// Resolve an abbreviation (`UTC`, `PST`) or numeric offset (`+0100`, `-05:00`).
pub fn resolve_timezone(token: &str) -> Result<FixedOffset, TimestampError> {
    let unknown = || TimestampError::UnknownTimezone(token.to_string());

    let minutes = if let Some(sign) = token.chars().next().filter(|c| *c == '+' || *c == '-') {
        let digits: String = token[1..].chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(unknown());
        }
        let hours: i32 = digits[..2].parse().map_err(|_| unknown())?;
        let mins: i32 = digits[2..].parse().map_err(|_| unknown())?;
        if hours > 23 || mins > 59 {
            return Err(unknown());
        }
        let total = hours * 60 + mins;
        if sign == '-' { -total } else { total }
    } else {
        let upper = token.to_ascii_uppercase();
        TZ_ABBREVIATIONS
            .iter()
            .find(|(name, _)| *name == upper)
            .map(|(_, offset)| *offset)
            .ok_or_else(unknown)?
    };

    FixedOffset::east_opt(minutes * 60).ok_or_else(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc_millis(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    // ── Epoch ────────────────────────────────────────────────────

    #[test]
    fn test_epoch_millis() {
        let ts = parse_timestamp("1423441663000", Locale::English).unwrap();
        assert_eq!(ts, utc_millis(1_423_441_663_000));
    }

    #[test]
    fn test_epoch_beyond_representable_range() {
        assert!(matches!(
            parse_timestamp("9223372036854775807", Locale::English),
            Err(TimestampError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_timestamp("92233720368547758070", Locale::English),
            Err(TimestampError::InvalidEpoch(_))
        ));
        assert!(parse_timestamp("-62135596800000", Locale::English).is_ok());
    }

    #[test]
    fn test_epoch_rejects_text() {
        let err = parse_timestamp("Wrong Date Format", Locale::English).unwrap_err();
        assert!(matches!(err, TimestampError::InvalidEpoch(_)));
    }

    // ── Textual ──────────────────────────────────────────────────

    #[test]
    fn test_textual_utc_matches_epoch() {
        let ts = parse_timestamp("Feb 09 2015 00:27:43 UTC", Locale::English).unwrap();
        assert_eq!(ts, utc_millis(1_423_441_663_000));
    }

    #[test]
    fn test_textual_with_millis() {
        let ts = parse_timestamp("Feb 09 2015 00:27:43.250 UTC", Locale::English).unwrap();
        assert_eq!(ts, utc_millis(1_423_441_663_250));
    }

    #[test]
    fn test_textual_french_locale() {
        let ts = parse_timestamp("juil. 09 2015 00:27:43 UTC", Locale::French).unwrap();
        assert_eq!(ts, utc_millis(1_436_401_663_000));
    }

    #[test]
    fn test_textual_without_timezone_is_local() {
        let ts = parse_timestamp("Feb 09 2015 00:27:43", Locale::English).unwrap();
        assert_eq!(ts, local(2015, 2, 9, 0, 27, 43));

        let ts = parse_timestamp("juil. 09 2015 00:27:43", Locale::French).unwrap();
        assert_eq!(ts, local(2015, 7, 9, 0, 27, 43));
    }

    #[test]
    fn test_textual_without_year_uses_current_year() {
        let ts = parse_timestamp("Jun 15 12:00:00 UTC", Locale::English).unwrap();
        assert_eq!(ts.year(), Local::now().year());
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn test_textual_numeric_offsets() {
        let expected = utc_millis(1_423_441_663_000);
        assert_eq!(parse_timestamp("Feb 09 2015 01:27:43 +0100", Locale::English).unwrap(), expected);
        assert_eq!(parse_timestamp("Feb 08 2015 19:27:43 -05:00", Locale::English).unwrap(), expected);
        assert_eq!(parse_timestamp("Feb 08 2015 19:27:43 EST", Locale::English).unwrap(), expected);
    }

    #[test]
    fn test_textual_rejections() {
        assert!(matches!(
            parse_timestamp("Foo 09 2015 00:27:43 UTC", Locale::English),
            Err(TimestampError::UnknownMonth { .. })
        ));
        assert!(matches!(
            parse_timestamp("Feb 09 2015 00:27:43 XYZ", Locale::English),
            Err(TimestampError::UnknownTimezone(_))
        ));
        assert!(matches!(
            parse_timestamp("Feb 9 2015 00:27:43", Locale::English),
            Err(TimestampError::UnrecognizedFormat(_))
        ));
        assert!(matches!(
            parse_timestamp("Feb 30 2015 00:27:43", Locale::English),
            Err(TimestampError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_timestamp("Feb 09 2015 00:27:43 UTC trailing", Locale::English),
            Err(TimestampError::UnrecognizedFormat(_))
        ));
    }

    // ── DST ──────────────────────────────────────────────────────

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0).unwrap()
    }

    #[test]
    fn test_gap_time_read_with_pre_transition_offset() {
        // 02:30 does not exist in New York on 2015-03-08; under EST it is
        // 07:30 UTC, which is 03:30 EDT.
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = with_offset(naive(2015, 3, 8, 2, 30), est);
        assert_eq!(ts, Utc.with_ymd_and_hms(2015, 3, 8, 7, 30, 0).unwrap());

        let edt = FixedOffset::west_opt(4 * 3600).unwrap();
        assert_eq!(ts.with_timezone(&edt).hour(), 3);
    }

    #[test]
    fn test_local_to_utc_fixed_offset() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            local_to_utc(&cet, naive(2015, 2, 9, 1, 27)),
            Utc.with_ymd_and_hms(2015, 2, 9, 0, 27, 0).unwrap()
        );
    }

    #[test]
    fn test_local_time_always_resolves() {
        for hour in 0..24 {
            let value = format!("Mar 08 2015 {:02}:30:00", hour);
            assert!(parse_timestamp(&value, Locale::English).is_ok(), "{} should resolve", value);
            let value = format!("Mar 29 2015 {:02}:30:00", hour);
            assert!(parse_timestamp(&value, Locale::English).is_ok(), "{} should resolve", value);
        }
    }

    #[test]
    fn test_resolve_timezone() {
        assert_eq!(resolve_timezone("utc").unwrap().local_minus_utc(), 0);
        assert_eq!(resolve_timezone("PDT").unwrap().local_minus_utc(), -7 * 3600);
        assert_eq!(resolve_timezone("+0530").unwrap().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert!(resolve_timezone("+2460").is_err());
        assert!(resolve_timezone("Mars").is_err());
    }
}
