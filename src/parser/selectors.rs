//! CSS selectors for the medal table
//!
//! Compiled once per process.

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    /// The medal table carries both the generic and the sortable marker class
    pub static ref MEDAL_TABLE: Selector = parse_selector!("table.wikitable.sortable");

    pub static ref LINK: Selector = parse_selector!("a");
}

/// Rows of a table, in document order
///
/// Only rows that belong to `table` itself are returned, directly or through
/// its `thead`/`tbody`/`tfoot` sections. Rows of a table nested in a cell
/// are left out.
pub fn table_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|row| row.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// Cells of a row, in document order
///
/// Only direct `td`/`th` children are returned so that a table nested in
/// a cell does not contribute cells to the outer row.
pub fn row_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .collect()
}
