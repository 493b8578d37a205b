//! Output serialization.
//!
//! Two shapes share one event pipeline: a structured JSON event list
//! (`{"events": [...]}` with stable field names) and a re-serialized
//! iCalendar document. ICS output re-applies line folding, rewrites the
//! temporal fields and the tagged description, and passes every other
//! property through byte-for-byte. The `X-WR-TIMEZONE` calendar property
//! is dropped so the importing calendar cannot second-guess times that
//! are already normalized.

use calbridge_core::{NormalizedEvent, TemporalValue};
use serde_json::json;

use crate::assembler::ParsedEvent;
use crate::document::{CalendarDocument, Component, DEFAULT_TIMEZONE_PROP};
use crate::normalize::Normalizer;
use crate::property::escape_text;
use crate::timezone::TimezoneContext;
use crate::unfold::fold_line;

/// Formats a temporal value as ISO-8601 for the JSON event list.
///
/// Absolute values carry a trailing `Z`; floating values are naive
/// wall-clock strings (the zone travels out of band); all-day values are
/// bare dates.
pub fn format_temporal(value: &TemporalValue) -> String {
    match value {
        TemporalValue::AllDay(date) => date.format("%Y-%m-%d").to_string(),
        TemporalValue::Floating(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        TemporalValue::Absolute(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    }
}

/// Serializes normalized events as the JSON feed consumed downstream.
pub fn to_json(events: &[NormalizedEvent]) -> String {
    let items: Vec<serde_json::Value> = events
        .iter()
        .map(|event| {
            json!({
                "uid": event.uid,
                "summary": event.summary,
                "description": event.description,
                "location": event.location,
                "start": format_temporal(&event.start),
                "end": event.end.as_ref().map(|end| format_temporal(end)),
                "all_day": event.all_day,
            })
        })
        .collect();
    let mut out = serde_json::to_string_pretty(&json!({ "events": items }))
        .unwrap_or_else(|_| "{\"events\": []}".to_string());
    out.push('\n');
    out
}

/// Re-serializes a document as normalized iCalendar text.
///
/// `events` is the output of [`crate::assembler::assemble`] for the same
/// document; VEVENT components with no assembled counterpart (no usable
/// start) are omitted. Lines are folded at `fold_width` and the document
/// ends with a trailing blank line.
pub fn to_ics(
    doc: &CalendarDocument,
    events: &[ParsedEvent],
    normalizer: &Normalizer<'_>,
    fold_width: usize,
) -> String {
    let context = doc.timezone_context();
    let mut lines: Vec<String> = Vec::new();
    lines.push("BEGIN:VCALENDAR".to_string());

    for property in &doc.properties {
        if property.is(DEFAULT_TIMEZONE_PROP) {
            continue;
        }
        lines.push(property.raw_line().to_string());
    }

    let mut remaining = events.iter().peekable();
    let mut position = 0usize;
    for component in &doc.components {
        match component {
            Component::Opaque(opaque) => {
                lines.extend(opaque.lines.iter().cloned());
            }
            Component::Event(_) => {
                if let Some(event) = remaining.next_if(|event| event.position == position) {
                    write_event(&mut lines, event, normalizer, &context);
                }
                // No assembled counterpart: the bag had no usable start.
                position += 1;
            }
        }
    }

    lines.push("END:VCALENDAR".to_string());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line, fold_width));
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out
}

fn write_event(
    lines: &mut Vec<String>,
    event: &ParsedEvent,
    normalizer: &Normalizer<'_>,
    context: &TimezoneContext,
) {
    let start = normalizer.resolve(&event.start, context);
    let end = normalizer.resolve(&event.end, context);
    let zone = normalizer.display_zone_name();

    lines.push("BEGIN:VEVENT".to_string());
    if event.uid_synthesized {
        lines.push(format!("UID:{}", event.uid));
    }

    let mut end_written = false;
    let mut description_written = false;
    for property in &event.properties {
        if property.is("DTSTART") {
            lines.push(temporal_property("DTSTART", &start, zone));
            // Keep a derived end next to the start it was derived from.
            if event.end_derived && !end_written {
                lines.push(temporal_property("DTEND", &end, zone));
                end_written = true;
            }
        } else if property.is("DTEND") {
            if !end_written {
                lines.push(temporal_property("DTEND", &end, zone));
                end_written = true;
            }
        } else if property.is("DURATION") {
            if !event.duration_consumed {
                lines.push(property.raw_line().to_string());
            }
        } else if property.is("DESCRIPTION") {
            lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
            description_written = true;
        } else {
            lines.push(property.raw_line().to_string());
        }
    }
    if !end_written {
        lines.push(temporal_property("DTEND", &end, zone));
    }
    if !description_written && !event.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
    }
    lines.push("END:VEVENT".to_string());
}

/// Renders a date/time property per the active policy's value shape.
fn temporal_property(name: &str, value: &TemporalValue, zone: Option<&str>) -> String {
    match value {
        TemporalValue::AllDay(date) => {
            format!("{};VALUE=DATE:{}", name, date.format("%Y%m%d"))
        }
        TemporalValue::Absolute(dt) => {
            format!("{}:{}", name, dt.format("%Y%m%dT%H%M%SZ"))
        }
        TemporalValue::Floating(dt) => match zone {
            Some(zone) => format!("{};TZID={}:{}", name, zone, dt.format("%Y%m%dT%H%M%S")),
            None => format!("{}:{}", name, dt.format("%Y%m%dT%H%M%S")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::normalize::OutputPolicy;
    use crate::timezone::IanaResolver;
    use crate::unfold::DEFAULT_FOLD_WIDTH;
    use calbridge_core::SourceTag;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn utc_normalizer(resolver: &IanaResolver) -> Normalizer<'_> {
        Normalizer::new(resolver, "America/New_York", OutputPolicy::Utc, None)
    }

    fn render(text: &str, tag: Option<&SourceTag>, normalizer: &Normalizer<'_>) -> String {
        let doc = CalendarDocument::parse(text);
        let events = assemble(&doc, tag);
        to_ics(&doc, &events, normalizer, DEFAULT_FOLD_WIDTH)
    }

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//League//Schedule//EN\r\n\
X-WR-TIMEZONE:Europe/Paris\r\n\
BEGIN:VEVENT\r\n\
UID:game-1\r\n\
DTSTART:20250901T140000\r\n\
DURATION:PT2H\r\n\
SUMMARY:Game day\r\n\
X-LEAGUE-ROUND:7\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn json_output_shape() {
        let event = NormalizedEvent::new(
            "game-1",
            TemporalValue::from_utc(Utc.with_ymd_and_hms(2025, 9, 1, 14, 0, 0).unwrap()),
        )
        .with_summary("Game day")
        .with_end(TemporalValue::from_utc(
            Utc.with_ymd_and_hms(2025, 9, 1, 15, 0, 0).unwrap(),
        ));

        let out = to_json(&[event]);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let item = &parsed["events"][0];
        assert_eq!(item["uid"], "game-1");
        assert_eq!(item["summary"], "Game day");
        assert_eq!(item["start"], "2025-09-01T14:00:00Z");
        assert_eq!(item["end"], "2025-09-01T15:00:00Z");
        assert_eq!(item["all_day"], false);
    }

    #[test]
    fn json_all_day_uses_bare_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let event = NormalizedEvent::new("d", TemporalValue::from_date(date))
            .with_end(TemporalValue::from_date(date.succ_opt().unwrap()));
        let out = to_json(&[event]);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["events"][0]["start"], "2025-09-01");
        assert_eq!(parsed["events"][0]["end"], "2025-09-02");
        assert_eq!(parsed["events"][0]["all_day"], true);
    }

    #[test]
    fn ics_rewrites_temporal_fields_to_utc() {
        let resolver = IanaResolver;
        let out = render(FEED, None, &utc_normalizer(&resolver));

        // 14:00 Paris (the calendar default) during CEST is 12:00Z.
        assert!(out.contains("DTSTART:20250901T120000Z\r\n"));
        assert!(out.contains("DTEND:20250901T140000Z\r\n"));
        // DURATION was consumed into the DTEND.
        assert!(!out.contains("DURATION"));
    }

    #[test]
    fn ics_drops_calendar_default_zone_property() {
        let resolver = IanaResolver;
        let out = render(FEED, None, &utc_normalizer(&resolver));
        assert!(!out.contains("X-WR-TIMEZONE"));
        assert!(out.contains("VERSION:2.0\r\n"));
    }

    #[test]
    fn ics_passes_unknown_properties_through() {
        let resolver = IanaResolver;
        let out = render(FEED, None, &utc_normalizer(&resolver));
        assert!(out.contains("X-LEAGUE-ROUND:7\r\n"));
        assert!(out.contains("PRODID:-//League//Schedule//EN\r\n"));
    }

    #[test]
    fn ics_ends_with_trailing_blank_line() {
        let resolver = IanaResolver;
        let out = render(FEED, None, &utc_normalizer(&resolver));
        assert!(out.ends_with("END:VCALENDAR\r\n\r\n"));
    }

    #[test]
    fn ics_tags_description() {
        let resolver = IanaResolver;
        let tag = SourceTag::new("league7");
        let out = render(FEED, Some(&tag), &utc_normalizer(&resolver));
        // The event had no DESCRIPTION; the tag creates one, escaped.
        assert!(out.contains("DESCRIPTION:[SRC: league7]\r\n"));

        // Re-processing the serialized output does not tag twice.
        let out2 = render(&out, Some(&tag), &utc_normalizer(&resolver));
        assert_eq!(out2.matches("[SRC: league7]").count(), 1);
    }

    #[test]
    fn ics_folds_long_lines() {
        let resolver = IanaResolver;
        let long = format!(
            "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:e\r\nDTSTART:20250901T140000Z\r\nDESCRIPTION:{}\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
            "word ".repeat(40)
        );
        let out = render(&long, None, &utc_normalizer(&resolver));
        for line in out.split("\r\n") {
            assert!(line.len() <= DEFAULT_FOLD_WIDTH, "unfolded line: {line}");
        }
    }

    #[test]
    fn ics_omits_events_without_start() {
        let resolver = IanaResolver;
        let text = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\nUID:no-start\r\nSUMMARY:fragment\r\nEND:VEVENT\r\n\
BEGIN:VEVENT\r\nUID:ok\r\nDTSTART:20250901T140000Z\r\nEND:VEVENT\r\n\
END:VCALENDAR\r\n";
        let out = render(text, None, &utc_normalizer(&resolver));
        assert!(!out.contains("no-start"));
        assert!(out.contains("UID:ok"));
    }

    #[test]
    fn ics_emits_synthesized_uid() {
        let resolver = IanaResolver;
        let text = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nDTSTART:20250901T140000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let out = render(text, None, &utc_normalizer(&resolver));
        assert!(out.contains("UID:calbridge-0-"));
    }

    #[test]
    fn local_policy_emits_tzid_parameter() {
        let resolver = IanaResolver;
        let normalizer = Normalizer::new(
            &resolver,
            "UTC",
            OutputPolicy::LocalWithZone,
            Some("Europe/Paris"),
        );
        let text = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:e\r\nDTSTART:20250901T120000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let out = render(text, None, &normalizer);
        assert!(out.contains("DTSTART;TZID=Europe/Paris:20250901T140000\r\n"));
    }

    #[test]
    fn all_day_events_keep_bare_dates() {
        let resolver = IanaResolver;
        let text = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:d\r\nDTSTART;VALUE=DATE:20250901\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let out = render(text, None, &utc_normalizer(&resolver));
        assert!(out.contains("DTSTART;VALUE=DATE:20250901\r\n"));
        assert!(out.contains("DTEND;VALUE=DATE:20250902\r\n"));
    }
}
