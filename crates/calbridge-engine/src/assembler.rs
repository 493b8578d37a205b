//! Event assembly.
//!
//! Consumes the decoded property bag of each VEVENT and produces
//! [`ParsedEvent`] candidates: text fields unescaped and trimmed, temporal
//! fields decoded (but not yet zone-resolved), the end time derived from
//! `DTEND`, `DURATION`, or the default-duration policy, and the source tag
//! applied idempotently.
//!
//! Assembly is best-effort: a malformed temporal value drops that field
//! with a diagnostic, and a bag without a usable start is discarded
//! silently (many feeds carry stray VEVENT fragments).

use calbridge_core::{NO_TITLE, SourceTag, TemporalValue};
use chrono::{Duration, Utc};

use crate::document::{CalendarDocument, EventComponent};
use crate::property::{Property, unescape_text};
use crate::temporal;

/// A decoded temporal field waiting for timezone resolution.
///
/// The `TZID` parameter is captured alongside the value so the resolution
/// chain can honor per-property zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTime {
    pub value: TemporalValue,
    pub tzid: Option<String>,
}

impl PendingTime {
    fn new(value: TemporalValue, tzid: Option<String>) -> Self {
        Self { value, tzid }
    }
}

/// An assembled event candidate, not yet zone-resolved.
#[derive(Debug, Clone)]
pub struct ParsedEvent {
    /// Index of the source VEVENT bag (or JSON item) in the document.
    /// The serializer uses it to pair events back with their components.
    pub position: usize,
    pub uid: String,
    /// True when the source omitted UID and one was synthesized.
    pub uid_synthesized: bool,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: PendingTime,
    pub end: PendingTime,
    /// True when the end was computed from `DURATION` or defaulted; the
    /// serializer then emits an explicit `DTEND`.
    pub end_derived: bool,
    /// True when a `DURATION` property was consumed to compute the end.
    pub duration_consumed: bool,
    pub all_day: bool,
    /// The full original property bag, for pass-through serialization.
    pub properties: Vec<Property>,
}

/// How long an event without `DTEND`/`DURATION` lasts: one day when
/// all-day, one hour otherwise. Feeds frequently omit end times for
/// single-instant reminders, so this default is part of the contract.
pub fn default_end(start: &TemporalValue) -> TemporalValue {
    let duration = if start.is_all_day() {
        Duration::days(1)
    } else {
        Duration::hours(1)
    };
    // Overflow is only reachable at the far edge of the representable
    // calendar; keep the start in that case.
    start.checked_add(duration).unwrap_or(*start)
}

/// Assembles all VEVENT bags of a document into event candidates.
pub fn assemble(doc: &CalendarDocument, tag: Option<&SourceTag>) -> Vec<ParsedEvent> {
    doc.events()
        .enumerate()
        .filter_map(|(position, bag)| assemble_one(bag, position, tag))
        .collect()
}

fn assemble_one(
    bag: &EventComponent,
    position: usize,
    tag: Option<&SourceTag>,
) -> Option<ParsedEvent> {
    let start = decode_time(bag, "DTSTART")?;

    let mut duration_consumed = false;
    let mut end_derived = false;
    let end = match decode_time(bag, "DTEND") {
        Some(end) if kinds_match(&start.value, &end.value) => end,
        Some(end) => {
            tracing::warn!(
                start = ?start.value,
                end = ?end.value,
                "DTEND kind does not match DTSTART, dropping the field"
            );
            end_derived = true;
            PendingTime::new(default_end(&start.value), start.tzid.clone())
        }
        None => {
            let value = match decode_event_duration(bag) {
                Some(duration) => {
                    duration_consumed = true;
                    start.value.checked_add(duration)
                }
                None => None,
            };
            end_derived = true;
            let value = value.unwrap_or_else(|| default_end(&start.value));
            PendingTime::new(value, start.tzid.clone())
        }
    };

    let uid = bag
        .get("UID")
        .map(|p| p.value.trim().to_string())
        .unwrap_or_default();
    let uid_synthesized = uid.is_empty();
    let uid = if uid_synthesized {
        synthesize_uid(position)
    } else {
        uid
    };

    let summary = text_field(bag, "SUMMARY");
    let summary = if summary.is_empty() {
        NO_TITLE.to_string()
    } else {
        summary
    };
    let description = text_field(bag, "DESCRIPTION");
    let description = match tag {
        Some(tag) => tag.apply(&description),
        None => description,
    };

    tracing::debug!(uid = %uid, summary = %summary, "assembled event");

    Some(ParsedEvent {
        position,
        all_day: start.value.is_all_day(),
        uid,
        uid_synthesized,
        summary,
        description,
        location: text_field(bag, "LOCATION"),
        start,
        end,
        end_derived,
        duration_consumed,
        properties: bag.properties.clone(),
    })
}

/// Decodes a named date/time property, capturing its `TZID`.
///
/// A malformed value is dropped with a diagnostic rather than failing the
/// event.
fn decode_time(bag: &EventComponent, name: &str) -> Option<PendingTime> {
    let property = bag.get(name)?;
    match temporal::decode(&property.value, property.param("VALUE")) {
        Ok(value) => Some(PendingTime::new(
            value,
            property.param("TZID").map(str::to_string),
        )),
        Err(err) => {
            tracing::warn!(property = name, error = %err, "dropping malformed temporal field");
            None
        }
    }
}

fn decode_event_duration(bag: &EventComponent) -> Option<Duration> {
    let property = bag.get("DURATION")?;
    match temporal::decode_duration(&property.value) {
        Ok(duration) => Some(duration),
        Err(err) => {
            tracing::warn!(error = %err, "dropping malformed DURATION");
            None
        }
    }
}

fn text_field(bag: &EventComponent, name: &str) -> String {
    bag.get(name)
        .map(|p| unescape_text(&p.value).trim().to_string())
        .unwrap_or_default()
}

/// An all-day start must pair with an all-day end; a timed start with a
/// timed end.
fn kinds_match(start: &TemporalValue, end: &TemporalValue) -> bool {
    start.is_all_day() == end.is_all_day()
}

/// Last-resort identifier for events whose source omits UID. Built from
/// the event's position and a fresh timestamp; collisions across runs are
/// acceptable.
fn synthesize_uid(position: usize) -> String {
    format!("calbridge-{}-{}", position, Utc::now().timestamp())
}
