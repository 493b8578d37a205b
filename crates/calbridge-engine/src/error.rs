//! Error types for the parsing/normalization engine.
//!
//! Decode-level errors never abort a document: a malformed temporal value
//! drops the field, a structural defect skips the offending line or
//! component. Only input that is not parseable at all (a JSON feed that is
//! not JSON) surfaces as an [`EngineError`].

use thiserror::Error;

/// Errors that abort processing of one input document.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The JSON feed payload was not valid JSON.
    #[error("invalid JSON feed: {0}")]
    JsonFeed(#[from] serde_json::Error),
}

/// A single date/time property value failed to decode.
///
/// Event-local and non-fatal: the caller drops the field and keeps the rest
/// of the event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed temporal value {value:?}: {reason}")]
pub struct TemporalError {
    /// The raw value that failed to decode.
    pub value: String,
    /// Why it was rejected.
    pub reason: &'static str,
}

impl TemporalError {
    pub(crate) fn new(value: impl Into<String>, reason: &'static str) -> Self {
        Self {
            value: value.into(),
            reason,
        }
    }
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
