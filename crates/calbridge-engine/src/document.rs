//! Calendar document model.
//!
//! A [`CalendarDocument`] owns the ordered top-level properties of a
//! VCALENDAR plus its components. VEVENT components are decoded into
//! property bags for the assembler; VTIMEZONE and every other component
//! kind are kept opaque (raw logical lines) and round-tripped unmodified.
//!
//! Parsing is lenient: feeds are commonly slightly non-conformant, so
//! structural defects (lines without `:`, unterminated components) skip
//! the offending piece and keep going rather than aborting the document.

use crate::property::Property;
use crate::timezone::TimezoneContext;
use crate::unfold::unfold;

/// Calendar-level property naming the feed's default timezone.
pub const DEFAULT_TIMEZONE_PROP: &str = "X-WR-TIMEZONE";

/// A parsed calendar document.
#[derive(Debug, Clone, Default)]
pub struct CalendarDocument {
    /// Top-level (VCALENDAR-scope) properties, in source order.
    pub properties: Vec<Property>,
    /// Components, in source order.
    pub components: Vec<Component>,
}

/// One top-level component of a calendar document.
#[derive(Debug, Clone)]
pub enum Component {
    /// A decoded VEVENT property bag.
    Event(EventComponent),
    /// Any other component (VTIMEZONE, VTODO, …), kept opaque.
    Opaque(OpaqueComponent),
}

/// The decoded property bag of one VEVENT.
#[derive(Debug, Clone, Default)]
pub struct EventComponent {
    /// All properties between `BEGIN:VEVENT` and `END:VEVENT`, in source
    /// order. Nested sub-components (VALARM) appear here as their raw
    /// `BEGIN`/`END`/body properties and round-trip untouched.
    pub properties: Vec<Property>,
}

/// A component preserved verbatim, including its `BEGIN`/`END` lines.
#[derive(Debug, Clone)]
pub struct OpaqueComponent {
    /// The component name (e.g. `VTIMEZONE`), upper-cased.
    pub name: String,
    /// Raw logical lines, `BEGIN`/`END` included.
    pub lines: Vec<String>,
}

impl CalendarDocument {
    /// Parses raw document text.
    ///
    /// Never fails: structural defects are skipped with a diagnostic and
    /// processing continues with the rest of the document.
    pub fn parse(text: &str) -> Self {
        let lines = unfold(text);
        let mut doc = Self::default();
        let mut event: Option<EventComponent> = None;
        let mut opaque: Option<(OpaqueComponent, u32)> = None;

        for line in lines {
            if line.is_empty() {
                continue;
            }
            let Some(property) = Property::parse(&line) else {
                tracing::warn!(line = %line, "skipping line without ':' separator");
                continue;
            };

            // Inside an opaque component: capture verbatim, tracking nested
            // BEGIN/END pairs until the matching END closes it.
            if let Some((mut component, mut depth)) = opaque.take() {
                let closes = property.is("END")
                    && property.value.eq_ignore_ascii_case(&component.name)
                    && depth == 0;
                if property.is("BEGIN") {
                    depth += 1;
                } else if property.is("END") && !closes && depth > 0 {
                    depth -= 1;
                }
                component.lines.push(line);
                if closes {
                    doc.components.push(Component::Opaque(component));
                } else {
                    opaque = Some((component, depth));
                }
                continue;
            }

            if let Some(mut bag) = event.take() {
                if property.is("END") && property.value.eq_ignore_ascii_case("VEVENT") {
                    doc.components.push(Component::Event(bag));
                } else if property.is("BEGIN") && property.value.eq_ignore_ascii_case("VEVENT") {
                    // A second BEGIN:VEVENT means the previous one was never
                    // terminated. Discard the fragment, start fresh.
                    tracing::warn!("unterminated VEVENT, discarding fragment");
                    event = Some(EventComponent::default());
                } else {
                    bag.properties.push(property);
                    event = Some(bag);
                }
                continue;
            }

            if property.is("BEGIN") {
                let name = property.value.trim().to_ascii_uppercase();
                match name.as_str() {
                    "VCALENDAR" => {} // structural wrapper, re-emitted on output
                    "VEVENT" => event = Some(EventComponent::default()),
                    _ => {
                        opaque = Some((
                            OpaqueComponent {
                                name,
                                lines: vec![line],
                            },
                            0,
                        ));
                    }
                }
            } else if property.is("END") {
                if !property.value.eq_ignore_ascii_case("VCALENDAR") {
                    tracing::warn!(component = %property.value, "stray END line, skipping");
                }
            } else {
                doc.properties.push(property);
            }
        }

        if event.is_some() {
            tracing::warn!("document ended inside a VEVENT, discarding fragment");
        }
        if let Some((component, _)) = opaque {
            tracing::warn!(component = %component.name, "document ended inside a component, discarding fragment");
        }

        doc
    }

    /// Derives the calendar-level default timezone from `X-WR-TIMEZONE`.
    pub fn timezone_context(&self) -> TimezoneContext {
        self.properties
            .iter()
            .find(|p| p.is(DEFAULT_TIMEZONE_PROP))
            .map(|p| TimezoneContext::with_default(p.value.trim()))
            .unwrap_or_default()
    }

    /// Returns the decoded VEVENT bags, in source order.
    pub fn events(&self) -> impl Iterator<Item = &EventComponent> {
        self.components.iter().filter_map(|c| match c {
            Component::Event(e) => Some(e),
            Component::Opaque(_) => None,
        })
    }
}

impl EventComponent {
    /// Returns the first property with the given name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.is(name))
    }
}
