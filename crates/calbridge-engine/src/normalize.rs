//! Temporal normalization policies.
//!
//! Every assembled event passes through exactly one of two policies,
//! selected at construction time:
//!
//! - **Utc**: resolved values are anchored to UTC and emitted with an
//!   explicit UTC marker. This is the default; floating output makes the
//!   importing calendar guess, and it guesses wrong.
//! - **LocalWithZone**: resolved values are converted to a configured
//!   display zone and emitted as floating wall-clock readings with the
//!   zone stated explicitly, never inferred from a calendar default.
//!
//! The two policies are mutually exclusive within one output document.

use calbridge_core::{NormalizedEvent, TemporalValue};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::assembler::{ParsedEvent, PendingTime};
use crate::timezone::{TimezoneContext, ZoneChain, ZoneResolver};

/// Output policy for temporal fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Emit every resolved value anchored to UTC.
    #[default]
    Utc,
    /// Emit every resolved value as wall-clock time in the display zone,
    /// with the zone stated explicitly.
    LocalWithZone,
}

/// Rewrites event temporal fields per the configured policy.
pub struct Normalizer<'a> {
    chain: ZoneChain<'a>,
    policy: OutputPolicy,
    display_zone: Option<Tz>,
}

impl<'a> Normalizer<'a> {
    /// Creates a normalizer.
    ///
    /// `fallback_zone` ends the timezone resolution chain; `display_zone`
    /// is only consulted under [`OutputPolicy::LocalWithZone`] (when absent
    /// or unresolvable, UTC is used as the display zone).
    pub fn new(
        resolver: &'a dyn ZoneResolver,
        fallback_zone: &'a str,
        policy: OutputPolicy,
        display_zone: Option<&str>,
    ) -> Self {
        let display_zone = display_zone.and_then(|name| {
            let zone = resolver.resolve(name);
            if zone.is_none() {
                tracing::warn!(zone = %name, "unresolvable display zone, using UTC");
            }
            zone
        });
        Self {
            chain: ZoneChain::new(resolver, fallback_zone),
            policy,
            display_zone,
        }
    }

    /// The active output policy.
    pub fn policy(&self) -> OutputPolicy {
        self.policy
    }

    /// The display zone name under the local-with-zone policy.
    pub fn display_zone_name(&self) -> Option<&'static str> {
        self.display_zone.map(|tz| tz.name())
    }

    /// Resolves a pending temporal field and applies the output policy.
    ///
    /// All-day values pass through untouched under both policies.
    pub fn resolve(&self, pending: &PendingTime, context: &TimezoneContext) -> TemporalValue {
        let resolved = self
            .chain
            .resolve(pending.value, pending.tzid.as_deref(), context);
        match (self.policy, resolved) {
            (OutputPolicy::Utc, value) => value,
            (OutputPolicy::LocalWithZone, TemporalValue::Absolute(dt)) => {
                let local = match self.display_zone {
                    Some(zone) => dt.with_timezone(&zone).naive_local(),
                    None => dt.naive_utc(),
                };
                TemporalValue::Floating(local)
            }
            (OutputPolicy::LocalWithZone, value) => value,
        }
    }

    /// Normalizes one assembled event into the output representation.
    pub fn normalize_event(&self, event: &ParsedEvent, context: &TimezoneContext) -> NormalizedEvent {
        NormalizedEvent {
            uid: event.uid.clone(),
            summary: event.summary.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            start: self.resolve(&event.start, context),
            end: Some(self.resolve(&event.end, context)),
            all_day: event.all_day,
        }
    }

    /// Normalizes a whole batch of assembled events.
    pub fn normalize_events(
        &self,
        events: &[ParsedEvent],
        context: &TimezoneContext,
    ) -> Vec<NormalizedEvent> {
        events
            .iter()
            .map(|event| self.normalize_event(event, context))
            .collect()
    }
}
