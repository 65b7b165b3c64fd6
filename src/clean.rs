//! Cleanup applied to raw question bodies before tokenization and storage.

use scraper::Html;

/// Strip markup from raw HTML, returning the concatenated text content.
///
/// Entities are decoded by the parser, so `&lt;` comes back as `<`.
pub fn clean_html(raw: &str) -> String {
    let document = Html::parse_document(raw);
    document.root_element().text().collect()
}

/// Trim every line, drop the empty ones, and concatenate the remainder.
///
/// The cleaned text is a single line with no interior newlines, which is the
/// form the vocabulary pass and the pairwise-text corpus file both expect.
pub fn clean_empty_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Full cleanup pipeline for raw question content.
pub fn clean_text(raw: &str) -> String {
    clean_empty_lines(&clean_html(raw))
}
