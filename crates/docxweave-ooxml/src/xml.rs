//! Text escaping for generated XML
//!
//! `quick_xml::escape::escape` handles markup characters only. Text coming
//! from users may also hold characters XML 1.0 cannot carry at all (most C0
//! controls) and carriage returns that parsers normalize away. Those are
//! rewritten here so every part stays well-formed.

use std::borrow::Cow;

use quick_xml::escape::escape;

/// Replacement for characters XML 1.0 cannot represent
pub const REPLACEMENT: char = '\u{FFFD}';

/// Whether `c` may appear in an XML 1.0 document
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape text for element content or attribute values
///
/// Markup characters become entities, `\r` becomes `&#xD;` so it survives
/// end-of-line handling, and characters outside the XML 1.0 range are
/// replaced with U+FFFD.
pub fn escape_text(raw: &str) -> Cow<'_, str> {
    if !raw.chars().any(|c| c == '\r' || !is_xml_char(c)) {
        return escape(raw);
    }

    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => out.push_str("&#xD;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(REPLACEMENT),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_borrows() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_control_characters_replaced() {
        assert_eq!(escape_text("a\u{1}b\u{B}c\u{0}"), "a\u{FFFD}b\u{FFFD}c\u{FFFD}");
        assert_eq!(escape_text("\u{FFFE}<"), "\u{FFFD}&lt;");
    }

    #[test]
    fn test_carriage_return_encoded() {
        assert_eq!(escape_text("x\r\ny"), "x&#xD;\ny");
    }

    #[test]
    fn test_allowed_whitespace_kept() {
        assert_eq!(escape_text("a\tb\nc"), "a\tb\nc");
        assert!(is_xml_char('\u{10000}'));
        assert!(!is_xml_char('\u{1F}'));
    }
}
