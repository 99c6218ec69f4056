//! HTML parsing and data extraction
//!
//! This module handles locating the medal table in a page and extracting
//! a country's rank and medal counts from it.

pub mod medal_table;
pub mod sanitize;
pub mod selectors;

// Re-export main parser and public types
pub use medal_table::{MedalTableParser, ParseAnomaly, ParseOutcome};
