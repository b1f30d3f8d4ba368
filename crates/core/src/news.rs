//! Legal-news feed parsing and keyword filtering.
//!
//! Handles RSS 2.0 `<item>` and Atom `<entry>` elements with a small set of
//! regexes. Feeds are fetched by the API layer; this module only turns the
//! raw XML into [`FeedEntry`] values and filters them.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Feeds used when `NEWS_FEEDS` is not configured.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://www.diariojudicial.com/rss/",
    "https://www.cij.gov.ar/rss/noticias.xml",
    "https://www.infobae.com/feeds/rss/politica/",
    "https://www.pagina12.com.ar/rss/secciones/sociedad/notas",
];

/// Longest summary kept per entry, in characters.
pub const MAX_SUMMARY_CHARS: usize = 500;

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item\b[^>]*>(.*?)</item>").expect("valid regex"));
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry\b[^>]*>(.*?)</entry>").expect("valid regex"));
static ATOM_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link\b[^>]*?href\s*=\s*["']([^"']+)["'][^>]*>"#).expect("valid regex")
});
static CDATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x?)([0-9a-fA-F]+);").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single news item, normalised across RSS and Atom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<String>,
    /// The feed URL the entry came from.
    pub source: String,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse every `<item>` (RSS) and `<entry>` (Atom) in `xml`.
///
/// Entries without a title are skipped.
pub fn parse_feed(xml: &str, source: &str) -> Vec<FeedEntry> {
    let rss = ITEM_RE.captures_iter(xml).filter_map(|cap| {
        let block = cap.get(1)?.as_str();
        build_entry(
            block,
            source,
            element_text(block, "link"),
            first_element(block, &["description", "content:encoded", "summary"]),
            first_element(block, &["pubDate", "dc:date", "published"]),
        )
    });

    let atom = ENTRY_RE.captures_iter(xml).filter_map(|cap| {
        let block = cap.get(1)?.as_str();
        let link = ATOM_LINK_RE
            .captures(block)
            .and_then(|c| c.get(1))
            .map(|m| decode_entities(m.as_str()));
        build_entry(
            block,
            source,
            link,
            first_element(block, &["summary", "content"]),
            first_element(block, &["published", "updated"]),
        )
    });

    rss.chain(atom).collect()
}

fn build_entry(
    block: &str,
    source: &str,
    link: Option<String>,
    summary: Option<String>,
    published: Option<String>,
) -> Option<FeedEntry> {
    let title = element_text(block, "title").filter(|t| !t.is_empty())?;
    Some(FeedEntry {
        title,
        link: link.unwrap_or_default(),
        summary: truncate_chars(&summary.unwrap_or_default(), MAX_SUMMARY_CHARS),
        published: published.filter(|p| !p.is_empty()),
        source: source.to_string(),
    })
}

fn first_element(block: &str, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| element_text(block, name).filter(|t| !t.is_empty()))
}

/// Text content of the first `<name>...</name>` element in `block`, cleaned.
fn element_text(block: &str, name: &str) -> Option<String> {
    let open = format!("<{name}");
    let close = format!("</{name}>");
    let mut search_from = 0;

    while let Some(rel) = block[search_from..].find(&open) {
        let start = search_from + rel;
        let after_name = start + open.len();
        // Must be exactly this element, not e.g. <linkedin> for <link.
        let next = block[after_name..].chars().next()?;
        if next != '>' && !next.is_whitespace() && next != '/' {
            search_from = after_name;
            continue;
        }
        let tag_end = after_name + block[after_name..].find('>')?;
        if block[..tag_end].ends_with('/') {
            // Self-closing element (e.g. Atom <link href=".."/>) has no text.
            search_from = tag_end + 1;
            continue;
        }
        let content_start = tag_end + 1;
        let content_end = content_start + block[content_start..].find(&close)?;
        return Some(clean_text(&block[content_start..content_end]));
    }
    None
}

/// Unwrap CDATA, decode entities, strip markup, and collapse whitespace.
pub fn clean_text(raw: &str) -> String {
    let unwrapped = CDATA_RE.replace_all(raw, "$1");
    let decoded = decode_entities(&unwrapped);
    let stripped = TAG_RE.replace_all(&decoded, " ");
    WHITESPACE_RE.replace_all(stripped.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        let radix = if caps[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    numeric
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep entries whose title or summary contains `query`, ignoring case.
/// An empty (or whitespace-only) query keeps everything.
pub fn filter_entries(entries: Vec<FeedEntry>, query: &str) -> Vec<FeedEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| format!("{} {}", e.title, e.summary).to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>Diario</title>
  <item>
    <title><![CDATA[Nueva ley de Mediación en Córdoba]]></title>
    <link>https://example.com/ley</link>
    <description>&lt;p&gt;La legislatura aprobó la reforma &amp; su reglamento.&lt;/p&gt;</description>
    <pubDate>Mon, 06 Oct 2025 10:00:00 -0300</pubDate>
  </item>
  <item>
    <title>Fútbol: resultados del domingo</title>
    <link>https://example.com/futbol</link>
    <description>Sin relación.</description>
  </item>
</channel></rss>"#;

    const ATOM: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>Acuerdos de mediación familiar</title>
    <link rel="alternate" href="https://example.org/acuerdos"/>
    <summary type="html">Resumen con &#233;nfasis</summary>
    <updated>2025-10-01T12:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items() {
        let entries = parse_feed(RSS, "https://example.com/rss");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Nueva ley de Mediación en Córdoba");
        assert_eq!(entries[0].link, "https://example.com/ley");
        assert_eq!(entries[0].summary, "La legislatura aprobó la reforma & su reglamento.");
        assert_eq!(
            entries[0].published.as_deref(),
            Some("Mon, 06 Oct 2025 10:00:00 -0300")
        );
        assert_eq!(entries[1].published, None);
        assert_eq!(entries[0].source, "https://example.com/rss");
    }

    #[test]
    fn parses_atom_entries() {
        let entries = parse_feed(ATOM, "atom");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "https://example.org/acuerdos");
        assert_eq!(entries[0].summary, "Resumen con énfasis");
        assert_eq!(entries[0].published.as_deref(), Some("2025-10-01T12:00:00Z"));
    }

    #[test]
    fn filter_is_case_insensitive_over_title_and_summary() {
        let entries = parse_feed(RSS, "rss");
        let hits = filter_entries(entries.clone(), "MEDIACIÓN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].link, "https://example.com/ley");

        let by_summary = filter_entries(entries.clone(), "reglamento");
        assert_eq!(by_summary.len(), 1);

        assert_eq!(filter_entries(entries, "  ").len(), 2);
    }

    #[test]
    fn garbage_yields_nothing() {
        assert!(parse_feed("<html>not a feed</html>", "x").is_empty());
    }

    #[test]
    fn long_summaries_are_truncated() {
        let long = format!(
            "<item><title>t</title><description>{}</description></item>",
            "a".repeat(MAX_SUMMARY_CHARS + 50)
        );
        let entries = parse_feed(&long, "x");
        assert_eq!(entries[0].summary.chars().count(), MAX_SUMMARY_CHARS + 1);
    }
}
