//! Document serialization.
//!
//! One serializer: [`CalendarHtmlSerializer`], which turns a laid-out
//! occupancy board into a single self-contained HTML/SVG document.

mod html;

pub use html::{CalendarHtmlSerializer, HtmlOptions, RUNTIME_VERSION, TOKEN_TTL_MS};

/// Escape text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"Müller & Söhne <"privat">"#),
            "Müller &amp; Söhne &lt;&quot;privat&quot;&gt;"
        );
        assert_eq!(escape_html("O'Brien"), "O&#x27;Brien");
        assert_eq!(escape_html("plain"), "plain");
    }
}
