//! Static country registry
//!
//! The set of countries that can be tracked, keyed by their canonical
//! three-letter code. The registry is a fixed table compiled into the
//! binary; lookups never allocate.

pub mod aliases;
pub mod matcher;

pub use aliases::NameAliasTable;
pub use matcher::CountryMatcher;

use serde::Serialize;
use std::fmt;

/// A trackable country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CountryRef {
    /// Canonical code, unique across the registry
    pub code: &'static str,

    /// Name as the medal table normally prints it
    pub display_name: &'static str,
}

impl CountryRef {
    const fn new(code: &'static str, display_name: &'static str) -> Self {
        Self { code, display_name }
    }
}

impl fmt::Display for CountryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.code)
    }
}

/// Participating nations
static COUNTRIES: &[CountryRef] = &[
    CountryRef::new("ALB", "Albania"),
    CountryRef::new("AND", "Andorra"),
    CountryRef::new("ARG", "Argentina"),
    CountryRef::new("ARM", "Armenia"),
    CountryRef::new("AUS", "Australia"),
    CountryRef::new("AUT", "Austria"),
    CountryRef::new("AZE", "Azerbaijan"),
    CountryRef::new("BEL", "Belgium"),
    CountryRef::new("BIH", "Bosnia and Herzegovina"),
    CountryRef::new("BRA", "Brazil"),
    CountryRef::new("BUL", "Bulgaria"),
    CountryRef::new("CAN", "Canada"),
    CountryRef::new("CHI", "Chile"),
    CountryRef::new("CHN", "China"),
    CountryRef::new("COL", "Colombia"),
    CountryRef::new("CRO", "Croatia"),
    CountryRef::new("CYP", "Cyprus"),
    CountryRef::new("CZE", "Czech Republic"),
    CountryRef::new("DEN", "Denmark"),
    CountryRef::new("ESP", "Spain"),
    CountryRef::new("EST", "Estonia"),
    CountryRef::new("FIN", "Finland"),
    CountryRef::new("FRA", "France"),
    CountryRef::new("GBR", "Great Britain"),
    CountryRef::new("GEO", "Georgia"),
    CountryRef::new("GER", "Germany"),
    CountryRef::new("GRE", "Greece"),
    CountryRef::new("HKG", "Hong Kong"),
    CountryRef::new("HUN", "Hungary"),
    CountryRef::new("IND", "India"),
    CountryRef::new("IRL", "Ireland"),
    CountryRef::new("ISL", "Iceland"),
    CountryRef::new("ISR", "Israel"),
    CountryRef::new("ITA", "Italy"),
    CountryRef::new("JAM", "Jamaica"),
    CountryRef::new("JPN", "Japan"),
    CountryRef::new("KAZ", "Kazakhstan"),
    CountryRef::new("KOR", "South Korea"),
    CountryRef::new("KOS", "Kosovo"),
    CountryRef::new("LAT", "Latvia"),
    CountryRef::new("LIE", "Liechtenstein"),
    CountryRef::new("LTU", "Lithuania"),
    CountryRef::new("LUX", "Luxembourg"),
    CountryRef::new("MDA", "Moldova"),
    CountryRef::new("MEX", "Mexico"),
    CountryRef::new("MKD", "North Macedonia"),
    CountryRef::new("MNE", "Montenegro"),
    CountryRef::new("MON", "Monaco"),
    CountryRef::new("NED", "Netherlands"),
    CountryRef::new("NOR", "Norway"),
    CountryRef::new("NZL", "New Zealand"),
    CountryRef::new("PAK", "Pakistan"),
    CountryRef::new("POL", "Poland"),
    CountryRef::new("POR", "Portugal"),
    CountryRef::new("PRK", "North Korea"),
    CountryRef::new("PUR", "Puerto Rico"),
    CountryRef::new("ROU", "Romania"),
    CountryRef::new("RSA", "South Africa"),
    CountryRef::new("RUS", "Russia"),
    CountryRef::new("SAN", "San Marino"),
    CountryRef::new("SER", "Serbia"),
    CountryRef::new("SLO", "Slovenia"),
    CountryRef::new("SVK", "Slovakia"),
    CountryRef::new("SUI", "Switzerland"),
    CountryRef::new("SWE", "Sweden"),
    CountryRef::new("THA", "Thailand"),
    CountryRef::new("TPE", "Chinese Taipei"),
    CountryRef::new("TUR", "Turkey"),
    CountryRef::new("UKR", "Ukraine"),
    CountryRef::new("USA", "United States"),
    CountryRef::new("UZB", "Uzbekistan"),
];

/// Look up a country by canonical code
pub fn lookup(code: &str) -> Option<&'static CountryRef> {
    COUNTRIES.iter().find(|c| c.code == code)
}

/// All countries in registry (code) order
pub fn all() -> &'static [CountryRef] {
    COUNTRIES
}

/// All countries sorted by display name, the order an operator picks from
pub fn sorted_by_name() -> Vec<&'static CountryRef> {
    let mut countries: Vec<_> = COUNTRIES.iter().collect();
    countries.sort_by(|a, b| a.display_name.cmp(b.display_name));
    countries
}
