//! Match medal-table labels against a tracked country

use super::{lookup, NameAliasTable};

/// Resolves free-text labels from the page to canonical codes
#[derive(Debug, Clone, Copy)]
pub struct CountryMatcher {
    aliases: &'static NameAliasTable,
}

impl CountryMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            aliases: NameAliasTable::global(),
        }
    }

    /// Whether `label` names the country with `code`
    ///
    /// An exact match on the canonical display name wins; otherwise the
    /// label must resolve through the alias table to the same code.
    pub fn matches(&self, label: &str, code: &str) -> bool {
        if lookup(code).is_some_and(|c| c.display_name == label) {
            return true;
        }

        self.resolve(label) == Some(code)
    }

    /// Resolve a label to its canonical code
    pub fn resolve(&self, label: &str) -> Option<&'static str> {
        self.aliases.resolve(label)
    }
}

impl Default for CountryMatcher {
    fn default() -> Self {
        Self::new()
    }
}
