// Core data structures for medalwatch

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank placeholder used when a country is unranked or unknown
pub const UNRANKED: &str = "-";

/// One country's standing in the medal table
///
/// Records are immutable: the only constructors compute `total` from the
/// three medal counts, so `total == gold + silver + bronze` always holds.
/// A coordinator replaces its record wholesale, it never edits one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedalRecord {
    rank: String,
    gold: u32,
    silver: u32,
    bronze: u32,
    total: u32,
}

impl MedalRecord {
    /// Create a record from counts read off a page
    ///
    /// Returns `None` when the counts do not sum within `u32`.
    pub fn try_new(rank: impl Into<String>, gold: u32, silver: u32, bronze: u32) -> Option<Self> {
        let total = gold.checked_add(silver)?.checked_add(bronze)?;
        Some(Self {
            rank: rank.into(),
            gold,
            silver,
            bronze,
            total,
        })
    }

    /// Create a record, deriving the total
    ///
    /// Counts must sum within `u32`; use [`MedalRecord::try_new`] for
    /// untrusted input.
    pub fn new(rank: impl Into<String>, gold: u32, silver: u32, bronze: u32) -> Self {
        Self {
            rank: rank.into(),
            gold,
            silver,
            bronze,
            total: gold + silver + bronze,
        }
    }

    /// The zero record: no data yet, or country not in the table
    pub fn zero() -> Self {
        Self::new(UNRANKED, 0, 0, 0)
    }

    pub fn rank(&self) -> &str {
        &self.rank
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn silver(&self) -> u32 {
        self.silver
    }

    pub fn bronze(&self) -> u32 {
        self.bronze
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Count for one medal kind
    pub fn count(&self, kind: MedalKind) -> u32 {
        match kind {
            MedalKind::Gold => self.gold,
            MedalKind::Silver => self.silver,
            MedalKind::Bronze => self.bronze,
            MedalKind::Total => self.total,
        }
    }

    /// Whether this is the zero record
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl Default for MedalRecord {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for MedalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rank {} ({} gold, {} silver, {} bronze, {} total)",
            self.rank, self.gold, self.silver, self.bronze, self.total
        )
    }
}

/// Medal count column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedalKind {
    Gold,
    Silver,
    Bronze,
    Total,
}

impl MedalKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
            Self::Total => "total",
        }
    }

    /// Get all kinds in display order
    pub fn all() -> [Self; 4] {
        [Self::Gold, Self::Silver, Self::Bronze, Self::Total]
    }
}

impl fmt::Display for MedalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
