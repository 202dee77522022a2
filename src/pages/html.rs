//! HTML escaping and embedded card templates.
//!
//! Templates are embedded at compile time and filled by `{placeholder}`
//! replacement, never by format strings, so user-controlled text cannot
//! smuggle format directives.

/// Card template (one gallery item)
pub const CARD_TEMPLATE: &str = include_str!("../embed/extra-networks-card.html");

/// Empty-state template (no items found; lists the allowed directories)
pub const NO_CARDS_TEMPLATE: &str = include_str!("../embed/extra-networks-no-cards.html");

/// Escape text for insertion into HTML content or attribute context.
///
/// Escapes the same five characters as the original UI's escaping helper,
/// so handler snippets built from escaped text round-trip identically.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape("hello world"), "hello world");
    }

    #[test]
    fn test_escape_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
        );
    }

    #[test]
    fn test_escape_amp_first() {
        // already-escaped input gets double-escaped, not left alone
        assert_eq!(escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_templates_have_expected_placeholders() {
        for placeholder in [
            "{preview_html}",
            "{name}",
            "{description}",
            "{card_clicked}",
            "{save_card_preview}",
            "{search_term}",
        ] {
            assert!(CARD_TEMPLATE.contains(placeholder), "{placeholder}");
        }
        assert!(NO_CARDS_TEMPLATE.contains("{dirs}"));
    }
}
