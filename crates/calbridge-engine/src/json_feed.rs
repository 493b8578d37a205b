//! Best-effort JSON feed decoding.
//!
//! Some upstreams publish loosely-structured JSON instead of iCalendar.
//! There is no format contract to preserve here: each logical field is
//! looked up through an ordered list of candidate keys, nested
//! `{dateTime|date}` wrappers are unwrapped one level, and items without a
//! usable start are skipped. The path feeds the same defaulting, tagging,
//! and normalization rules as the ICS path.

use calbridge_core::{NO_TITLE, SourceTag, TemporalValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::assembler::{ParsedEvent, PendingTime, default_end};
use crate::error::{EngineError, Result};

/// Candidate keys per logical field, in priority order.
const UID_KEYS: &[&str] = &["id", "uid", "eventId"];
const SUMMARY_KEYS: &[&str] = &["summary", "title", "subject", "name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "body", "details"];
const LOCATION_KEYS: &[&str] = &["location", "venue", "place"];
const START_KEYS: &[&str] = &["start", "startTime", "start_time", "begins"];
const END_KEYS: &[&str] = &["end", "endTime", "end_time", "ends"];

/// Keys of a one-level `{dateTime|date}` wrapper object.
const TIME_WRAPPER_KEYS: &[&str] = &["dateTime", "date"];

/// Decodes a JSON feed into event candidates.
///
/// Accepts an object with an `events` or `items` array, or a bare array.
///
/// # Errors
///
/// Returns [`EngineError::JsonFeed`] when the payload is not valid JSON at
/// all; anything else degrades per-item.
pub fn parse_json_feed(text: &str, tag: Option<&SourceTag>) -> Result<Vec<ParsedEvent>> {
    let value: Value = serde_json::from_str(text).map_err(EngineError::JsonFeed)?;

    let items: &[Value] = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("events")
            .or_else(|| map.get("items"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };
    if items.is_empty() {
        tracing::warn!("JSON feed contains no event array");
    }

    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| decode_item(item, position, tag))
        .collect())
}

fn decode_item(item: &Value, position: usize, tag: Option<&SourceTag>) -> Option<ParsedEvent> {
    let object = item.as_object()?;

    let Some(start) = first_key(object, START_KEYS).and_then(decode_time_value) else {
        tracing::debug!(position, "skipping JSON item without a usable start");
        return None;
    };
    let end = first_key(object, END_KEYS).and_then(decode_time_value);

    let all_day_flag = object.get("allDay").and_then(Value::as_bool);
    let (start, end) = coerce_all_day(start, end, all_day_flag);

    let mut end_derived = false;
    let end = match end {
        Some(end) if end.is_all_day() == start.is_all_day() => end,
        Some(_) | None => {
            end_derived = true;
            default_end(&start)
        }
    };

    let uid = first_key(object, UID_KEYS)
        .and_then(stringify)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let uid_synthesized = uid.is_none();
    let uid = uid.unwrap_or_else(|| format!("calbridge-{}-{}", position, Utc::now().timestamp()));

    let summary = lookup_text(object, SUMMARY_KEYS);
    let summary = if summary.is_empty() {
        NO_TITLE.to_string()
    } else {
        summary
    };
    let description = lookup_text(object, DESCRIPTION_KEYS);
    let description = match tag {
        Some(tag) => tag.apply(&description),
        None => description,
    };

    Some(ParsedEvent {
        position,
        all_day: start.is_all_day(),
        uid,
        uid_synthesized,
        summary,
        description,
        location: lookup_text(object, LOCATION_KEYS),
        start: PendingTime {
            value: start,
            tzid: None,
        },
        end: PendingTime {
            value: end,
            tzid: None,
        },
        end_derived,
        duration_consumed: false,
        properties: Vec::new(),
    })
}

/// First present candidate key wins, even when its value later fails to
/// decode; the priority order is part of the contract.
fn first_key<'a>(object: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn lookup_text(object: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    first_key(object, keys)
        .and_then(stringify)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes a start/end JSON value, unwrapping `{dateTime|date}` one level.
fn decode_time_value(value: &Value) -> Option<TemporalValue> {
    let raw = match value {
        Value::Object(wrapper) => first_key(wrapper, TIME_WRAPPER_KEYS)?,
        other => other,
    };
    let text = raw.as_str()?.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(TemporalValue::Absolute(dt.with_timezone(&Utc)));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(TemporalValue::Floating(dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(TemporalValue::AllDay(date));
    }
    tracing::debug!(value = %text, "unrecognized JSON timestamp");
    None
}

/// An explicit `allDay: true` turns timed values into their date portion.
/// The reverse never happens: all-day values stay all-day.
fn coerce_all_day(
    start: TemporalValue,
    end: Option<TemporalValue>,
    flag: Option<bool>,
) -> (TemporalValue, Option<TemporalValue>) {
    if flag != Some(true) {
        return (start, end);
    }
    (
        TemporalValue::AllDay(start.date()),
        end.map(|v| TemporalValue::AllDay(v.date())),
    )
}
