//! Content line decoding.
//!
//! A logical line such as `DTSTART;TZID=America/New_York:20250901T140000`
//! decodes into a property name, a parameter map, and the raw (still
//! escaped) value. The original line is retained so unrecognized properties
//! can be re-serialized byte-for-byte.

/// A decoded content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name, upper-cased.
    pub name: String,
    /// Parameters in source order; keys upper-cased and unique.
    params: Vec<(String, String)>,
    /// Raw value, still escaped.
    pub value: String,
    /// The original logical line, for pass-through serialization.
    raw: String,
}

impl Property {
    /// Decodes one logical line.
    ///
    /// Returns `None` when the line contains no `:` separator ("not a
    /// property"; the caller treats it as a structural defect). Parameter
    /// segments without `=` are ignored, not fatal. One layer of
    /// surrounding double quotes is stripped from parameter values.
    pub fn parse(line: &str) -> Option<Self> {
        let (head, value) = line.split_once(':')?;
        let mut segments = head.split(';');
        let name = segments.next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }

        let mut params: Vec<(String, String)> = Vec::new();
        for segment in segments {
            let Some((key, raw_value)) = segment.split_once('=') else {
                tracing::debug!(segment, "ignoring malformed property parameter");
                continue;
            };
            let key = key.trim().to_ascii_uppercase();
            let value = strip_quotes(raw_value).to_string();
            if params.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            params.push((key, value));
        }

        Some(Self {
            name,
            params,
            value: value.to_string(),
            raw: line.to_string(),
        })
    }

    /// Case-insensitive parameter lookup.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the original logical line.
    pub fn raw_line(&self) -> &str {
        &self.raw
    }

    /// Returns true when the name matches (names are stored upper-cased).
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Strips one layer of surrounding double quotes, if present.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Unescapes iCalendar text values.
///
/// `\n` and `\N` become newlines; `\,`, `\;` and `\\` lose their backslash.
/// Unknown escapes are left untouched.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Escapes text for serialization, the inverse of [`unescape_text`].
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
