//! WordprocessingML text helpers.
//!
//! Paragraphs and text runs are located with regular expressions rather than
//! a full XML parser: only `<w:p>` elements and the `<w:t>` runs inside them
//! are ever read or rewritten, and the rest of each part is passed through
//! byte for byte.

use std::sync::LazyLock;

use regex::Regex;

/// A `<w:p>` element with its content. Self-closing `<w:p/>` and
/// `<w:pPr>`-style siblings do not match.
pub static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:p(?:\s[^>]*[^/>])?>.*?</w:p>").expect("valid regex"));

/// A `<w:t>` text run; group 1 is the (escaped) text.
pub static TEXT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:t(?:\s[^>]*[^/>])?>(.*?)</w:t>").expect("valid regex"));

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Concatenated, unescaped text of every run in a paragraph.
pub fn paragraph_text(paragraph: &str) -> String {
    TEXT_RUN_RE
        .captures_iter(paragraph)
        .map(|c| unescape(&c[1]))
        .collect()
}

/// Text of every paragraph in a part, in document order.
pub fn paragraphs(xml: &str) -> Vec<String> {
    PARAGRAPH_RE
        .find_iter(xml)
        .map(|m| paragraph_text(m.as_str()))
        .collect()
}

/// Put `text` into the first run of `paragraph` and blank every other run.
/// Run properties (bold, font, ...) of the first run are kept; newlines
/// become line breaks inside that run.
pub fn rewrite_paragraph_text(paragraph: &str, text: &str) -> String {
    let mut first = true;
    TEXT_RUN_RE
        .replace_all(paragraph, |_: &regex::Captures| {
            if first {
                first = false;
                format!(r#"<w:t xml:space="preserve">{}</w:t>"#, run_text(text))
            } else {
                "<w:t></w:t>".to_string()
            }
        })
        .into_owned()
}

/// Escaped run content with `\n` turned into `<w:br/>` between text nodes.
pub fn run_text(text: &str) -> String {
    text.split('\n')
        .map(escape)
        .collect::<Vec<_>>()
        .join(r#"</w:t><w:br/><w:t xml:space="preserve">"#)
}
