//! RFC 5545 line unfolding and folding.
//!
//! The iCalendar wire format wraps long content lines: any physical line
//! beginning with a single space or horizontal tab continues the previous
//! logical line. Unfolding must run before any property parsing; parsing
//! folded lines directly corrupts values that span folds (long
//! descriptions, long URLs).

/// Maximum content line width before folding, per RFC 5545 (75 octets,
/// excluding the line break).
pub const DEFAULT_FOLD_WIDTH: usize = 75;

/// Reconstructs logical lines from raw document text.
///
/// A physical line starting with one space or tab is a continuation: exactly
/// one leading whitespace character is stripped and the remainder appended
/// to the previous logical line. A continuation with no preceding logical
/// line is dropped. Blank physical lines are preserved as empty logical
/// lines; the property-parsing caller filters them out.
///
/// Both `\r\n` and bare `\n` line endings are accepted.
pub fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for physical in text.split('\n') {
        let physical = physical.strip_suffix('\r').unwrap_or(physical);
        if let Some(rest) = physical
            .strip_prefix(' ')
            .or_else(|| physical.strip_prefix('\t'))
        {
            match lines.last_mut() {
                Some(previous) => previous.push_str(rest),
                // Continuation with nothing to continue.
                None => tracing::debug!(line = %physical, "dropping orphan continuation line"),
            }
        } else {
            lines.push(physical.to_string());
        }
    }
    // split('\n') yields a trailing empty segment when the text ends with a
    // newline; that segment is not a logical line.
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// Folds one logical line at the given width, the inverse of [`unfold`].
///
/// Segments are joined with `\r\n` plus a single leading space; the space
/// counts toward the width of continuation segments. Splits never land
/// inside a UTF-8 code point, so a multi-byte character may push a segment
/// one or two octets under the width.
pub fn fold_line(line: &str, width: usize) -> String {
    let width = width.max(2);
    if line.len() <= width {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / width * 3);
    let mut rest = line;
    let mut first = true;
    while !rest.is_empty() {
        let limit = if first { width } else { width - 1 };
        let mut end = limit.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            // A code point wider than the limit still has to go somewhere.
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        if !first {
            out.push_str("\r\n ");
        }
        out.push_str(&rest[..end]);
        rest = &rest[end..];
        first = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_unfolded_lines() {
        let lines = unfold("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n");
        assert_eq!(lines, vec!["BEGIN:VCALENDAR", "VERSION:2.0", "END:VCALENDAR"]);
    }

    #[test]
    fn joins_continuation_lines() {
        let text = "DESCRIPTION:This is a lo\r\n ng description\r\n  that spans three lines\r\n";
        let lines = unfold(text);
        assert_eq!(
            lines,
            vec!["DESCRIPTION:This is a long description that spans three lines"]
        );
    }

    #[test]
    fn tab_continuation_strips_one_character() {
        let lines = unfold("SUMMARY:Game\r\n\t day\r\n");
        assert_eq!(lines, vec!["SUMMARY:Game day"]);
    }

    #[test]
    fn accepts_bare_newlines() {
        let lines = unfold("SUMMARY:Ga\n me\nUID:1\n");
        assert_eq!(lines, vec!["SUMMARY:Game", "UID:1"]);
    }

    #[test]
    fn drops_leading_orphan_continuation() {
        let lines = unfold(" orphan\r\nSUMMARY:ok\r\n");
        assert_eq!(lines, vec!["SUMMARY:ok"]);
    }

    #[test]
    fn preserves_blank_lines() {
        let lines = unfold("SUMMARY:a\r\n\r\nUID:1\r\n");
        assert_eq!(lines, vec!["SUMMARY:a", "", "UID:1"]);
    }

    #[test]
    fn short_lines_are_not_folded() {
        assert_eq!(fold_line("SUMMARY:short", 75), "SUMMARY:short");
    }

    #[test]
    fn folds_at_width() {
        let line = format!("DESCRIPTION:{}", "x".repeat(100));
        let folded = fold_line(&line, 75);
        for segment in folded.split("\r\n") {
            assert!(segment.len() <= 75, "segment too long: {}", segment.len());
        }
        assert!(folded.contains("\r\n "));
    }

    #[test]
    fn fold_never_splits_multibyte_characters() {
        let line = format!("DESCRIPTION:{}", "é".repeat(80));
        let folded = fold_line(&line, 75);
        for segment in folded.split("\r\n") {
            assert!(segment.len() <= 75);
        }
        let recovered = unfold(&format!("{folded}\r\n"));
        assert_eq!(recovered, vec![line]);
    }

    #[test]
    fn unfold_fold_roundtrip() {
        let original = format!("DESCRIPTION:{}", "long value with spaces ".repeat(10));
        let folded = fold_line(&original, 75);
        let recovered = unfold(&format!("{folded}\r\n"));
        assert_eq!(recovered, vec![original]);
    }
}
