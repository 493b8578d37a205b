//! Temporal value types for calendar events.
//!
//! This module provides [`TemporalValue`], the semantic representation of a
//! decoded calendar timestamp. A value is one of:
//! - **AllDay**: a plain date with no time-of-day
//! - **Floating**: a wall-clock date-time with no attached zone
//! - **Absolute**: a date-time anchored to UTC
//!
//! An `AllDay` value is never converted into a time-bearing value; once a
//! field is all-day it stays all-day through the whole pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decoded calendar timestamp.
///
/// The meaning of a `Floating` value depends on context (a per-property
/// `TZID`, the calendar default zone, or a configured fallback); the
/// timezone resolution chain turns it into an `Absolute` value downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TemporalValue {
    /// A plain date, no time-of-day (all-day events).
    AllDay(NaiveDate),
    /// A wall-clock date-time with no attached zone.
    Floating(NaiveDateTime),
    /// A date-time anchored to UTC.
    Absolute(DateTime<Utc>),
}

impl TemporalValue {
    /// Creates an all-day value from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Creates a floating value from a naive wall-clock reading.
    pub fn from_floating(dt: NaiveDateTime) -> Self {
        Self::Floating(dt)
    }

    /// Creates an absolute value from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::Absolute(dt)
    }

    /// Returns `true` if this is an all-day value.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns `true` if this is a floating (zone-less) value.
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating(_))
    }

    /// Returns `true` if this is a UTC-anchored value.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// Returns the date if this is an `AllDay` value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::AllDay(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the naive datetime if this is a `Floating` value.
    pub fn as_floating(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Floating(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the UTC datetime if this is an `Absolute` value.
    pub fn as_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Absolute(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the date portion of this value.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::AllDay(d) => *d,
            Self::Floating(dt) => dt.date(),
            Self::Absolute(dt) => dt.date_naive(),
        }
    }

    /// Shifts this value forward by a duration, staying in-kind.
    ///
    /// All-day values advance by whole days (sub-day components are
    /// truncated), floating values stay floating, absolute values stay
    /// absolute. Returns `None` on arithmetic overflow.
    pub fn checked_add(&self, duration: chrono::Duration) -> Option<Self> {
        match self {
            Self::AllDay(d) => d
                .checked_add_signed(chrono::Duration::days(duration.num_days()))
                .map(Self::AllDay),
            Self::Floating(dt) => dt.checked_add_signed(duration).map(Self::Floating),
            Self::Absolute(dt) => dt.checked_add_signed(duration).map(Self::Absolute),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn variant_predicates() {
        let all_day = TemporalValue::from_date(date(2025, 9, 1));
        assert!(all_day.is_all_day());
        assert!(!all_day.is_floating());
        assert!(!all_day.is_absolute());

        let floating = TemporalValue::from_floating(naive(2025, 9, 1, 14, 0, 0));
        assert!(floating.is_floating());
        assert!(!floating.is_all_day());

        let absolute = TemporalValue::from_utc(utc(2025, 9, 1, 14, 0, 0));
        assert!(absolute.is_absolute());
        assert!(!absolute.is_floating());
    }

    #[test]
    fn accessors() {
        let d = date(2025, 9, 1);
        assert_eq!(TemporalValue::from_date(d).as_date(), Some(d));
        assert_eq!(TemporalValue::from_date(d).as_floating(), None);

        let n = naive(2025, 9, 1, 14, 30, 0);
        assert_eq!(TemporalValue::from_floating(n).as_floating(), Some(n));
        assert_eq!(TemporalValue::from_floating(n).as_utc(), None);

        let u = utc(2025, 9, 1, 14, 30, 0);
        assert_eq!(TemporalValue::from_utc(u).as_utc(), Some(u));
        assert_eq!(TemporalValue::from_utc(u).as_date(), None);
    }

    #[test]
    fn date_portion() {
        assert_eq!(TemporalValue::from_date(date(2025, 9, 1)).date(), date(2025, 9, 1));
        assert_eq!(
            TemporalValue::from_floating(naive(2025, 9, 1, 23, 59, 59)).date(),
            date(2025, 9, 1)
        );
        assert_eq!(
            TemporalValue::from_utc(utc(2025, 9, 1, 0, 0, 0)).date(),
            date(2025, 9, 1)
        );
    }

    #[test]
    fn add_stays_in_kind() {
        let all_day = TemporalValue::from_date(date(2025, 9, 1));
        let next = all_day.checked_add(chrono::Duration::days(1)).unwrap();
        assert_eq!(next, TemporalValue::from_date(date(2025, 9, 2)));
        assert!(next.is_all_day());

        let floating = TemporalValue::from_floating(naive(2025, 9, 1, 14, 0, 0));
        let later = floating.checked_add(chrono::Duration::hours(1)).unwrap();
        assert_eq!(later.as_floating(), Some(naive(2025, 9, 1, 15, 0, 0)));

        let absolute = TemporalValue::from_utc(utc(2025, 9, 1, 23, 30, 0));
        let later = absolute.checked_add(chrono::Duration::hours(1)).unwrap();
        assert_eq!(later.as_utc(), Some(utc(2025, 9, 2, 0, 30, 0)));
    }

    #[test]
    fn add_truncates_sub_day_for_all_day() {
        // A 90-minute shift does not turn an all-day value into a timed one.
        let all_day = TemporalValue::from_date(date(2025, 9, 1));
        let shifted = all_day.checked_add(chrono::Duration::minutes(90)).unwrap();
        assert_eq!(shifted, all_day);
        assert!(shifted.is_all_day());
    }

    #[test]
    fn serde_roundtrip() {
        for value in [
            TemporalValue::from_date(date(2025, 9, 1)),
            TemporalValue::from_floating(naive(2025, 9, 1, 14, 0, 0)),
            TemporalValue::from_utc(utc(2025, 9, 1, 14, 0, 0)),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let parsed: TemporalValue = serde_json::from_str(&json).unwrap();
            assert_eq!(value, parsed);
        }
    }
}
