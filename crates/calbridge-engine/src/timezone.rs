//! Timezone resolution for floating timestamps.
//!
//! A floating value has no zone of its own; the effective zone comes from a
//! deterministic precedence chain: the property's `TZID` parameter, then
//! the calendar-level default (`X-WR-TIMEZONE`), then a configured fallback
//! zone. When even the fallback cannot be resolved the wall-clock reading
//! is taken as already being UTC — lossy, but an event never fails over a
//! zone lookup.
//!
//! Zone lookup goes through the [`ZoneResolver`] capability so tests can
//! substitute a fake zone table instead of the process-wide database.

use calbridge_core::TemporalValue;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolves zone identifiers to concrete timezones.
pub trait ZoneResolver {
    /// Returns the zone for an identifier, or `None` when unknown.
    fn resolve(&self, name: &str) -> Option<Tz>;
}

/// Production resolver backed by the bundled IANA database.
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaResolver;

impl ZoneResolver for IanaResolver {
    fn resolve(&self, name: &str) -> Option<Tz> {
        name.parse().ok()
    }
}

/// The calendar-level default zone, derived from `X-WR-TIMEZONE`.
///
/// Computed once per document and immutable afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimezoneContext {
    default_zone: Option<String>,
}

impl TimezoneContext {
    /// A context with no calendar default.
    pub fn none() -> Self {
        Self::default()
    }

    /// A context with the given calendar default zone identifier.
    pub fn with_default(zone: impl Into<String>) -> Self {
        Self {
            default_zone: Some(zone.into()),
        }
    }

    /// The calendar default zone identifier, if any.
    pub fn default_zone(&self) -> Option<&str> {
        self.default_zone.as_deref()
    }
}

/// The timezone resolution chain.
pub struct ZoneChain<'a> {
    resolver: &'a dyn ZoneResolver,
    fallback: &'a str,
}

impl<'a> ZoneChain<'a> {
    /// Creates a chain with the given resolver and configured fallback
    /// zone identifier.
    pub fn new(resolver: &'a dyn ZoneResolver, fallback: &'a str) -> Self {
        Self { resolver, fallback }
    }

    /// Resolves a floating wall-clock reading to a UTC instant.
    ///
    /// Precedence, first match wins: the property `TZID`, the document
    /// default zone, the configured fallback. Unknown zone names fall
    /// through with a warning; if nothing resolves, the reading is taken
    /// as UTC.
    pub fn resolve_floating(
        &self,
        local: NaiveDateTime,
        tzid: Option<&str>,
        context: &TimezoneContext,
    ) -> DateTime<Utc> {
        let candidates = [tzid, context.default_zone(), Some(self.fallback)];
        for name in candidates.into_iter().flatten() {
            match self.resolver.resolve(name) {
                Some(zone) => return localize(zone, local),
                None => {
                    tracing::warn!(zone = %name, "unresolvable timezone, falling through");
                }
            }
        }
        Utc.from_utc_datetime(&local)
    }

    /// Applies the chain to a temporal value.
    ///
    /// Only `Floating` values are resolved; `AllDay` passes through
    /// untouched and `Absolute` is never re-localized.
    pub fn resolve(
        &self,
        value: TemporalValue,
        tzid: Option<&str>,
        context: &TimezoneContext,
    ) -> TemporalValue {
        match value {
            TemporalValue::Floating(local) => {
                TemporalValue::Absolute(self.resolve_floating(local, tzid, context))
            }
            other => other,
        }
    }
}

/// Localizes a wall-clock reading in a zone and converts to UTC.
///
/// DST overlaps take the earlier reading; readings inside a DST gap do not
/// exist locally and fall back to being read as UTC.
fn localize(zone: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match zone.from_local_datetime(&local).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            tracing::warn!(%local, %zone, "wall-clock reading inside a DST gap, treating as UTC");
            Utc.from_utc_datetime(&local)
        }
    }
}
