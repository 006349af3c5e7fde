//! Page title extraction from HTML responses.
//!
//! Parsing is permissive: malformed markup, odd encodings and missing tags
//! all degrade to an empty title instead of failing the probe.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use scraper::{Html, Selector};

/// Maximum body size handed to the HTML parser.
const MAX_PARSE_SIZE: usize = 2 * 1024 * 1024;

/// Check whether a response declares an HTML body.
pub fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.to_ascii_lowercase().contains("text/html"))
}

/// Extract the trimmed text of the first `<title>` element.
pub fn extract_title(body: &[u8]) -> String {
    let body = &body[..body.len().min(MAX_PARSE_SIZE)];
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
