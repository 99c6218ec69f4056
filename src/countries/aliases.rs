//! Alternate country names as they appear on the source page

use lazy_static::lazy_static;
use std::collections::HashMap;

use super::all;

/// Curated spellings that differ from, or duplicate, a registry name
const CURATED: &[(&str, &str)] = &[
    ("United States", "USA"),
    ("Great Britain", "GBR"),
    ("South Korea", "KOR"),
    ("North Korea", "PRK"),
    ("Chinese Taipei", "TPE"),
    ("Czech Republic", "CZE"),
    ("New Zealand", "NZL"),
    ("South Africa", "RSA"),
    ("Czechia", "CZE"),
    ("Türkiye", "TUR"),
    ("Hong Kong, China", "HKG"),
];

lazy_static! {
    static ref ALIASES: NameAliasTable = NameAliasTable::build();
}

/// Mapping from a page label to a canonical country code
///
/// Lookup is total over the curated aliases plus every registry display
/// name; anything else resolves to `None`.
#[derive(Debug)]
pub struct NameAliasTable {
    entries: HashMap<&'static str, &'static str>,
}

impl NameAliasTable {
    fn build() -> Self {
        let mut entries: HashMap<&'static str, &'static str> = CURATED.iter().copied().collect();

        for country in all() {
            entries.insert(country.display_name, country.code);
        }

        Self { entries }
    }

    /// The process-wide table
    pub fn global() -> &'static NameAliasTable {
        &ALIASES
    }

    /// Resolve a label to its canonical code
    pub fn resolve(&self, label: &str) -> Option<&'static str> {
        self.entries.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
