//! Matcher: three independent join strategies between the reference (CM360)
//! and source (GAM) datasets.
//!
//! Each strategy produces its own family of [`MatchGroup`]s. Groups are keyed
//! by the reference label together with the reference row's own impressions
//! and clicks, so one identifier reported with two different metric pairs
//! yields two groups.

mod engine;
mod strategy;

pub use engine::{evaluate_strategy, InMemoryMatcher};
pub use strategy::{strategy_for, IdInNameMatch, IdMatch, MatchStrategy, PrefixNameMatch};

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The three join rules, in their fixed concatenation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Reference identifier equals source identifier
    IdMatch,
    /// Reference identifier occurs inside the source display name
    IdInNameMatch,
    /// Source display name starts with the reference display name
    PrefixNameMatch,
}

impl MatchType {
    /// Every strategy, in concatenation order.
    pub const ALL: [MatchType; 3] = [
        MatchType::IdMatch,
        MatchType::IdInNameMatch,
        MatchType::PrefixNameMatch,
    ];

    /// Position in the concatenation order.
    pub fn rank(self) -> usize {
        match self {
            MatchType::IdMatch => 0,
            MatchType::IdInNameMatch => 1,
            MatchType::PrefixNameMatch => 2,
        }
    }

    /// Sort and deduplicate a strategy list into concatenation order.
    pub fn canonical(strategies: &[MatchType]) -> Vec<MatchType> {
        let set: BTreeSet<MatchType> = strategies.iter().copied().collect();
        set.into_iter().collect()
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::IdMatch => write!(f, "IdMatch"),
            MatchType::IdInNameMatch => write!(f, "IdInNameMatch"),
            MatchType::PrefixNameMatch => write!(f, "PrefixNameMatch"),
        }
    }
}

/// Aggregate of every (reference, source) pair that shares one group key
/// under one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchGroup {
    /// Strategy that produced the group
    pub match_type: MatchType,

    /// Reference identifier (or display name for prefix matches)
    pub reference_key: String,

    /// Lexicographically smallest matched source label
    pub source_representative: String,

    /// Reference impressions (part of the group key)
    pub reference_impressions: i64,

    /// Reference clicks (part of the group key)
    pub reference_clicks: i64,

    /// Source impressions summed over joined pairs
    pub source_impressions: i64,

    /// Source clicks summed over joined pairs
    pub source_clicks: i64,

    /// Number of joined (reference, source) pairs
    pub matched_pairs: usize,

    /// Smallest reference row number in the group
    pub first_reference_row: usize,
}

impl MatchGroup {
    pub(crate) fn open(
        match_type: MatchType,
        reference_key: &str,
        reference_impressions: i64,
        reference_clicks: i64,
        first_reference_row: usize,
        source_label: &str,
    ) -> Self {
        Self {
            match_type,
            reference_key: reference_key.to_string(),
            source_representative: source_label.to_string(),
            reference_impressions,
            reference_clicks,
            source_impressions: 0,
            source_clicks: 0,
            matched_pairs: 0,
            first_reference_row,
        }
    }

    /// Add one joined source row. Fails if either sum leaves the i64 range.
    pub(crate) fn absorb(
        &mut self,
        source_label: &str,
        impressions: i64,
        clicks: i64,
    ) -> CoreResult<()> {
        let source_impressions = self
            .source_impressions
            .checked_add(impressions)
            .ok_or_else(|| self.overflow("source impressions"))?;
        let source_clicks = self
            .source_clicks
            .checked_add(clicks)
            .ok_or_else(|| self.overflow("source clicks"))?;

        if source_label < self.source_representative.as_str() {
            self.source_representative = source_label.to_string();
        }
        self.source_impressions = source_impressions;
        self.source_clicks = source_clicks;
        self.matched_pairs += 1;
        Ok(())
    }

    /// Overflow error naming this group.
    pub fn overflow(&self, quantity: &str) -> CoreError {
        CoreError::overflow(format!(
            "{} {} of group '{}'",
            self.match_type, quantity, self.reference_key
        ))
    }
}

/// Everything the matcher found for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Groups of all evaluated strategies, in concatenation order and, within
    /// a strategy, in order of first reference row
    pub groups: Vec<MatchGroup>,

    /// Strategies that were evaluated, in concatenation order
    pub strategies: Vec<MatchType>,

    /// Reference row numbers matched by at least one evaluated strategy
    pub matched_reference_rows: BTreeSet<usize>,
}

impl MatchOutcome {
    /// Groups produced by one strategy.
    pub fn groups_for(&self, match_type: MatchType) -> impl Iterator<Item = &MatchGroup> {
        self.groups
            .iter()
            .filter(move |g| g.match_type == match_type)
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
