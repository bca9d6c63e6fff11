//! HTML text helpers

use scraper::Html;

/// Strip all markup from `markup`, returning the concatenated text nodes.
///
/// Parsing is lenient (html5ever); entities are decoded and whitespace is
/// kept exactly as it appears between tags.
pub fn html_to_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    document.root_element().text().collect()
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
