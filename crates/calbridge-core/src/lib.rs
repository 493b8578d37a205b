//! Core types: temporal values, normalized events, source tags

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{NO_TITLE, NormalizedEvent, SourceTag};
pub use time::TemporalValue;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
