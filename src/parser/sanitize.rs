//! Cell text cleanup
//!
//! Medal tables decorate cells with footnote references (`[a]`, `[12]`),
//! host-nation markers (`*`, `‡`) and non-breaking spaces. These helpers
//! strip the decoration so labels and counts compare cleanly.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

use super::selectors::LINK;
use crate::utils::normalize_whitespace;

static FOOTNOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("Invalid regex pattern"));

/// Markers appended to a country name (host nation, disputed results)
const TRAILING_MARKERS: &[char] = &['*', '‡', '†', '#'];

/// Clean raw text taken from a table cell
///
/// # Examples
///
/// ```
/// use medalwatch::parser::sanitize::clean_cell_text;
///
/// assert_eq!(clean_cell_text(" Italy*[a] "), "Italy");
/// assert_eq!(clean_cell_text("12\u{00A0}"), "12");
/// ```
pub fn clean_cell_text(text: &str) -> String {
    let without_footnotes = FOOTNOTE_REGEX.replace_all(text, "");
    let normalized = normalize_whitespace(&without_footnotes);

    normalized
        .trim_end_matches(TRAILING_MARKERS)
        .trim_end()
        .to_string()
}

/// Cleaned text of a whole cell
pub fn cell_text(cell: ElementRef<'_>) -> String {
    clean_cell_text(&cell.text().collect::<String>())
}

/// Country label of a cell
///
/// The text of the first link carrying visible text, otherwise the text of
/// the cell itself. Flag-image links and footnote links have no text once
/// cleaned and are passed over.
pub fn country_label(cell: ElementRef<'_>) -> String {
    cell.select(&LINK)
        .map(cell_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| cell_text(cell))
}
