//! iCalendar parsing and timestamp-normalization engine.
//!
//! The pipeline is strictly top-down:
//!
//! ```text
//! raw text
//!    │ unfold            (logical lines)
//!    ▼
//! Property decoding      (name / params / raw value)
//!    ▼
//! CalendarDocument       (top-level props + components)
//!    ▼
//! assemble               (per-event property bags → ParsedEvent)
//!    ▼
//! Normalizer             (timezone chain + output policy)
//!    ▼
//! NormalizedEvent        → JSON event list or re-serialized ICS
//! ```
//!
//! Decode-level errors never abort a document: malformed temporal values
//! drop the field, structural defects skip the offending piece. Only fetch
//! failures (upstream of this crate) and output IO are fatal.

pub mod assembler;
pub mod document;
pub mod error;
pub mod json_feed;
pub mod normalize;
pub mod property;
pub mod serialize;
pub mod temporal;
pub mod timezone;
pub mod unfold;

pub use assembler::{ParsedEvent, PendingTime, assemble, default_end};
pub use document::{CalendarDocument, Component, EventComponent, OpaqueComponent};
pub use error::{EngineError, TemporalError};
pub use json_feed::parse_json_feed;
pub use normalize::{Normalizer, OutputPolicy};
pub use property::Property;
pub use serialize::{format_temporal, to_ics, to_json};
pub use timezone::{IanaResolver, TimezoneContext, ZoneChain, ZoneResolver};
pub use unfold::{DEFAULT_FOLD_WIDTH, fold_line, unfold};
