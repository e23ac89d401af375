//! Discrepancy detector: deltas, zero-delta suppression, and the final
//! ranking of mismatches across strategies.

use crate::error::CoreResult;
use crate::matcher::{MatchGroup, MatchType};
use serde::Serialize;
use std::cmp::Ordering;

/// A matched group whose source totals disagree with the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    pub match_type: MatchType,
    pub reference_identifier: String,
    pub source_identifier: String,
    pub reference_impressions: i64,
    pub aggregated_source_impressions: i64,
    pub impressions_delta: i64,
    pub reference_clicks: i64,
    pub aggregated_source_clicks: i64,
    pub clicks_delta: i64,
}

impl MatchCandidate {
    /// Compute deltas (source minus reference) for a group.
    pub fn from_group(group: &MatchGroup) -> CoreResult<Self> {
        let impressions_delta = group
            .source_impressions
            .checked_sub(group.reference_impressions)
            .ok_or_else(|| group.overflow("impressions delta"))?;
        let clicks_delta = group
            .source_clicks
            .checked_sub(group.reference_clicks)
            .ok_or_else(|| group.overflow("clicks delta"))?;

        Ok(Self {
            match_type: group.match_type,
            reference_identifier: group.reference_key.clone(),
            source_identifier: group.source_representative.clone(),
            reference_impressions: group.reference_impressions,
            aggregated_source_impressions: group.source_impressions,
            impressions_delta,
            reference_clicks: group.reference_clicks,
            aggregated_source_clicks: group.source_clicks,
            clicks_delta,
        })
    }

    /// Whether either metric disagrees.
    pub fn is_discrepancy(&self) -> bool {
        self.impressions_delta != 0 || self.clicks_delta != 0
    }
}

/// Ranking order: impressions delta descending, then clicks delta descending.
pub fn rank_order(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.impressions_delta
        .cmp(&a.impressions_delta)
        .then_with(|| b.clicks_delta.cmp(&a.clicks_delta))
}

/// Turn match groups into the ranked list of discrepancies.
///
/// Groups are first put in strategy concatenation order (stable, so the
/// within-strategy order survives), zero-delta groups are dropped, and the
/// union is stably sorted by [`rank_order`].
pub fn detect(groups: &[MatchGroup]) -> CoreResult<Vec<MatchCandidate>> {
    let mut ordered: Vec<&MatchGroup> = groups.iter().collect();
    ordered.sort_by_key(|g| g.match_type.rank());

    let mut candidates = ordered
        .into_iter()
        .map(MatchCandidate::from_group)
        .collect::<CoreResult<Vec<_>>>()?;
    candidates.retain(MatchCandidate::is_discrepancy);
    candidates.sort_by(rank_order);

    log::debug!(
        "{} of {} matched groups disagree",
        candidates.len(),
        groups.len()
    );
    Ok(candidates)
}

#[cfg(test)]
#[path = "detect_test.rs"]
mod tests;
