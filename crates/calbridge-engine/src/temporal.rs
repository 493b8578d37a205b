//! Date/time value decoding.
//!
//! Feeds encode timestamps three ways: an 8-digit date (`20250901`) marked
//! with `VALUE=DATE`, a UTC date-time with a trailing `Z`
//! (`20250901T140000Z`), and a zone-less floating date-time
//! (`20250901T140000`). The rules below are tried in that order; one
//! unambiguous winner per input shape, no silent fallback between shapes.
//!
//! Calendar-invalid components (month 13, second 60) are rejected as
//! malformed, never clamped.

use calbridge_core::TemporalValue;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::TemporalError;

/// Decodes a raw date/time value plus its `VALUE` parameter.
///
/// # Errors
///
/// Returns [`TemporalError`] when the value matches no known encoding.
/// Callers must treat this as event-local: drop the field, keep the event.
pub fn decode(raw: &str, value_param: Option<&str>) -> Result<TemporalValue, TemporalError> {
    let raw = raw.trim();

    if value_param.is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
        && let Some(date) = parse_date8(raw)
    {
        return Ok(TemporalValue::AllDay(date));
    }

    if let Some(stripped) = raw.strip_suffix('Z') {
        let naive = parse_datetime15(stripped)
            .ok_or_else(|| TemporalError::new(raw, "expected YYYYMMDDTHHMMSS before 'Z'"))?;
        return Ok(TemporalValue::Absolute(Utc.from_utc_datetime(&naive)));
    }

    if let Some(naive) = parse_datetime15(raw) {
        return Ok(TemporalValue::Floating(naive));
    }

    // A bare 8-digit date without VALUE=DATE does not match any rule.
    Err(TemporalError::new(raw, "unrecognized date/time encoding"))
}

/// Decodes an RFC 5545 dur-value (`P1D`, `PT1H30M`, `-P2W`, …).
///
/// # Errors
///
/// Returns [`TemporalError`] when the value does not match the grammar or
/// names no components at all.
pub fn decode_duration(raw: &str) -> Result<Duration, TemporalError> {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let body = rest
        .strip_prefix('P')
        .ok_or_else(|| TemporalError::new(raw, "duration must start with 'P'"))?;

    let (date_part, time_part) = match body.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (body, None),
    };

    let mut total = Duration::zero();
    let mut components = 0usize;

    let mut scan = |part: &str, units: &[(char, i64)]| -> Result<(), TemporalError> {
        let mut digits = String::new();
        for c in part.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let Some(&(_, seconds)) = units.iter().find(|(unit, _)| *unit == c) else {
                return Err(TemporalError::new(raw, "unexpected duration designator"));
            };
            if digits.is_empty() {
                return Err(TemporalError::new(raw, "duration designator without digits"));
            }
            let n: i64 = digits
                .parse()
                .map_err(|_| TemporalError::new(raw, "duration component out of range"))?;
            total = total + Duration::seconds(n * seconds);
            components += 1;
            digits.clear();
        }
        if !digits.is_empty() {
            return Err(TemporalError::new(raw, "trailing digits without designator"));
        }
        Ok(())
    };

    scan(date_part, &[('W', 7 * 86_400), ('D', 86_400)])?;
    if let Some(time_part) = time_part {
        scan(time_part, &[('H', 3_600), ('M', 60), ('S', 1)])?;
    }

    if components == 0 {
        return Err(TemporalError::new(raw, "duration names no components"));
    }
    Ok(if negative { -total } else { total })
}

/// Parses an 8-digit `YYYYMMDD` date, rejecting calendar-invalid dates.
fn parse_date8(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses a 15-character `YYYYMMDDTHHMMSS` date-time.
///
/// Seconds beyond 59 and other calendar-invalid components are rejected.
fn parse_datetime15(s: &str) -> Option<NaiveDateTime> {
    let bytes = s.as_bytes();
    if bytes.len() != 15 || bytes[8] != b'T' {
        return None;
    }
    let date = parse_date8(&s[0..8])?;
    let time = &s[9..15];
    if !time.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = time[0..2].parse().ok()?;
    let minute: u32 = time[2..4].parse().ok()?;
    let second: u32 = time[4..6].parse().ok()?;
    if second > 59 {
        return None;
    }
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(date.and_time(time))
}
