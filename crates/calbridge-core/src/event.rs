//! Normalized event representation.
//!
//! This module provides [`NormalizedEvent`], the output shape of the
//! parsing/normalization pipeline, and [`SourceTag`], the idempotent marker
//! appended to event descriptions so a downstream importer can recognize
//! (and later remove) events originating from a given feed.

use serde::{Deserialize, Serialize};

use crate::time::TemporalValue;

/// Fallback title for events whose summary is missing or blank.
pub const NO_TITLE: &str = "(No title)";

/// A normalized calendar event, ready for downstream import.
///
/// Invariant: `all_day` is true iff `start` (and `end`, when present) is an
/// all-day value. The constructor derives the flag from `start`; callers
/// must not set an all-day start together with a timed end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Unique identifier. Synthesized when the source omits one.
    pub uid: String,
    /// Event title; never empty (falls back to [`NO_TITLE`]).
    pub summary: String,
    /// Unescaped description text, source tag included.
    pub description: String,
    /// Unescaped location text; empty when absent.
    pub location: String,
    /// When the event starts.
    pub start: TemporalValue,
    /// When the event ends, if an end could be resolved.
    pub end: Option<TemporalValue>,
    /// Whether this is an all-day event.
    pub all_day: bool,
}

impl NormalizedEvent {
    /// Creates a new event with the required fields.
    ///
    /// `all_day` is derived from `start`.
    pub fn new(uid: impl Into<String>, start: TemporalValue) -> Self {
        Self {
            uid: uid.into(),
            summary: NO_TITLE.to_string(),
            description: String::new(),
            location: String::new(),
            all_day: start.is_all_day(),
            start,
            end: None,
        }
    }

    /// Builder method to set the summary, keeping the fallback on blank input.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        if !summary.trim().is_empty() {
            self.summary = summary;
        }
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: TemporalValue) -> Self {
        self.end = Some(end);
        self
    }
}

/// An opaque marker appended to event descriptions.
///
/// The tag text is `[SRC: <id>]`. Application is idempotent: a description
/// that already contains the exact tag text is returned unchanged, so
/// re-processing the same feed never stacks tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTag {
    text: String,
}

impl SourceTag {
    /// Creates a tag for the given source identifier.
    pub fn new(source_id: impl AsRef<str>) -> Self {
        Self {
            text: format!("[SRC: {}]", source_id.as_ref()),
        }
    }

    /// Returns the exact tag text, e.g. `[SRC: league7]`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends the tag to a description unless it is already present.
    ///
    /// The tag is separated from existing text by a blank line; an empty
    /// description becomes the tag alone.
    pub fn apply(&self, description: &str) -> String {
        if description.contains(&self.text) {
            return description.to_string();
        }
        if description.is_empty() {
            self.text.clone()
        } else {
            format!("{}\n\n{}", description, self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_start() -> TemporalValue {
        TemporalValue::from_date(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
    }

    mod event {
        use super::*;
        use chrono::{TimeZone, Utc};

        #[test]
        fn all_day_flag_follows_start() {
            let event = NormalizedEvent::new("uid-1", sample_start());
            assert!(event.all_day);

            let timed = NormalizedEvent::new(
                "uid-2",
                TemporalValue::from_utc(Utc.with_ymd_and_hms(2025, 9, 1, 14, 0, 0).unwrap()),
            );
            assert!(!timed.all_day);
        }

        #[test]
        fn summary_falls_back_when_blank() {
            let event = NormalizedEvent::new("uid-1", sample_start()).with_summary("   ");
            assert_eq!(event.summary, NO_TITLE);

            let event = NormalizedEvent::new("uid-1", sample_start()).with_summary("Game day");
            assert_eq!(event.summary, "Game day");
        }

        #[test]
        fn builder_sets_optional_fields() {
            let end = TemporalValue::from_date(NaiveDate::from_ymd_opt(2025, 9, 2).unwrap());
            let event = NormalizedEvent::new("uid-1", sample_start())
                .with_description("details")
                .with_location("Stadium")
                .with_end(end);

            assert_eq!(event.description, "details");
            assert_eq!(event.location, "Stadium");
            assert_eq!(event.end, Some(end));
        }

        #[test]
        fn serde_roundtrip() {
            let event = NormalizedEvent::new("uid-1", sample_start()).with_summary("Match");
            let json = serde_json::to_string(&event).unwrap();
            let parsed: NormalizedEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event, parsed);
        }
    }

    mod source_tag {
        use super::*;

        #[test]
        fn tag_text_shape() {
            assert_eq!(SourceTag::new("league7").text(), "[SRC: league7]");
        }

        #[test]
        fn applies_after_blank_line() {
            let tag = SourceTag::new("league7");
            assert_eq!(tag.apply("Game day"), "Game day\n\n[SRC: league7]");
        }

        #[test]
        fn empty_description_becomes_tag() {
            let tag = SourceTag::new("league7");
            assert_eq!(tag.apply(""), "[SRC: league7]");
        }

        #[test]
        fn application_is_idempotent() {
            let tag = SourceTag::new("league7");
            let once = tag.apply("Game day");
            let twice = tag.apply(&once);
            assert_eq!(once, twice);
            assert_eq!(once.matches("[SRC: league7]").count(), 1);
        }

        #[test]
        fn detects_tag_anywhere_in_text() {
            let tag = SourceTag::new("league7");
            let already = "prefix [SRC: league7] suffix";
            assert_eq!(tag.apply(already), already);
        }
    }
}
