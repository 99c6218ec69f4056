//! Medal table parser
//!
//! Finds the medal table in a page and extracts one country's row.
//!
//! Real tables are irregular. Tied countries share a rank cell spanning
//! several rows, so some rows start with the country instead of the rank;
//! the parser carries the last seen rank forward and shifts the medal
//! columns accordingly. A bad row is logged and skipped, never fatal.

use scraper::{ElementRef, Html};
use thiserror::Error;

use crate::countries::CountryMatcher;
use crate::crawler::FetchedPage;
use crate::models::{MedalKind, MedalRecord, UNRANKED};
use crate::parser::sanitize::{cell_text, country_label};
use crate::parser::selectors::{row_cells, table_rows, MEDAL_TABLE};
use crate::utils::{decode_html, is_ascii_digits};

/// Rows shorter than this are spacers or captions
const MIN_ROW_CELLS: usize = 4;

/// Result of scanning a page for one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The country's row was found
    Found(MedalRecord),

    /// The table was scanned to the end without a match
    NotListed,

    /// The page has no medal table
    TableMissing,
}

impl ParseOutcome {
    /// Fold the outcome into the record readers see
    pub fn into_record(self) -> MedalRecord {
        match self {
            Self::Found(record) => record,
            Self::NotListed | Self::TableMissing => MedalRecord::zero(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Short label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotListed => "not_listed",
            Self::TableMissing => "table_missing",
        }
    }
}

/// A row that matched but could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAnomaly {
    /// Medal cell is not a non-negative integer
    #[error("{kind} cell is not a count: {text:?}")]
    InvalidCount { kind: MedalKind, text: String },

    /// Row ends before the three medal columns
    #[error("row has {found} cells, medal columns need {needed}")]
    MissingCells { needed: usize, found: usize },

    /// Medal counts do not fit in a total
    #[error("medal total overflows: {gold} + {silver} + {bronze}")]
    CountOverflow { gold: u32, silver: u32, bronze: u32 },
}

/// Row layout after column-shift detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowLayout {
    country: usize,
    medals: usize,
}

/// Medal table parser
#[derive(Debug, Clone, Default)]
pub struct MedalTableParser {
    matcher: CountryMatcher,
}

impl MedalTableParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: CountryMatcher::new(),
        }
    }

    #[must_use]
    pub fn with_matcher(matcher: CountryMatcher) -> Self {
        Self { matcher }
    }

    /// Parse a raw body of unknown encoding
    pub fn parse(&self, raw: &[u8], country_code: &str) -> ParseOutcome {
        self.parse_html(&decode_html(raw, None), country_code)
    }

    /// Parse a fetched page, honoring its declared charset
    pub fn parse_page(&self, page: &FetchedPage, country_code: &str) -> ParseOutcome {
        self.parse_html(&page.text(), country_code)
    }

    /// Parse an HTML document
    pub fn parse_html(&self, html: &str, country_code: &str) -> ParseOutcome {
        let document = Html::parse_document(html);

        let Some(table) = document.select(&MEDAL_TABLE).next() else {
            tracing::error!(country = %country_code, "Could not find medal table on page");
            return ParseOutcome::TableMissing;
        };

        let mut last_rank = UNRANKED.to_string();

        // The first row is the header
        for (index, row) in table_rows(table).into_iter().enumerate().skip(1) {
            let cells = row_cells(row);
            if cells.len() < MIN_ROW_CELLS {
                continue;
            }

            match self.scan_row(&cells, &mut last_rank, country_code) {
                Ok(Some(record)) => {
                    tracing::debug!(country = %country_code, record = %record, "Found country row");
                    return ParseOutcome::Found(record);
                }
                Ok(None) => {}
                Err(anomaly) => {
                    tracing::warn!(
                        country = %country_code,
                        row = index,
                        error = %anomaly,
                        "Error parsing row, skipping"
                    );
                }
            }
        }

        tracing::info!(
            country = %country_code,
            "Country not yet in medal table, returning zeros"
        );
        ParseOutcome::NotListed
    }

    /// Examine one data row
    ///
    /// Updates `last_rank` when the row carries a rank. Returns the record
    /// when the row belongs to `country_code`.
    fn scan_row(
        &self,
        cells: &[ElementRef<'_>],
        last_rank: &mut String,
        country_code: &str,
    ) -> Result<Option<MedalRecord>, ParseAnomaly> {
        let layout = detect_layout(cells[0], last_rank);

        let label = country_label(cells[layout.country]);
        tracing::trace!(label = %label, rank = %last_rank, "Found country");

        if !self.matcher.matches(&label, country_code) {
            return Ok(None);
        }

        let needed = layout.medals + 3;
        if cells.len() < needed {
            return Err(ParseAnomaly::MissingCells {
                needed,
                found: cells.len(),
            });
        }

        let gold = parse_count(cells[layout.medals], MedalKind::Gold)?;
        let silver = parse_count(cells[layout.medals + 1], MedalKind::Silver)?;
        let bronze = parse_count(cells[layout.medals + 2], MedalKind::Bronze)?;

        MedalRecord::try_new(last_rank.clone(), gold, silver, bronze)
            .map(Some)
            .ok_or(ParseAnomaly::CountOverflow {
                gold,
                silver,
                bronze,
            })
    }
}

/// Decide where the country and medal columns start
///
/// A digit-only `td` first cell is the rank and becomes the carried rank.
/// A blank first cell is an empty rank cell: the rank carries over from
/// the row above. Anything else, a `th` row header included, is the
/// country cell of a row whose rank cell was merged into an earlier row.
fn detect_layout(first_cell: ElementRef<'_>, last_rank: &mut String) -> RowLayout {
    let first = cell_text(first_cell);
    if first_cell.value().name() == "td" && is_ascii_digits(&first) {
        *last_rank = first;
        RowLayout { country: 1, medals: 2 }
    } else if first.is_empty() {
        RowLayout { country: 1, medals: 2 }
    } else {
        RowLayout { country: 0, medals: 1 }
    }
}

/// Read a medal count; an empty cell counts as zero
fn parse_count(cell: ElementRef<'_>, kind: MedalKind) -> Result<u32, ParseAnomaly> {
    let text = cell_text(cell);
    if text.is_empty() {
        return Ok(0);
    }

    text.parse::<u32>()
        .map_err(|_| ParseAnomaly::InvalidCount { kind, text })
}
