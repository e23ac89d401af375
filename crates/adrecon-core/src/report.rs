//! Comparison report: the sections a reconciliation run hands to a renderer.
//!
//! The detector's ranked candidates are the only required input; totals and
//! unmatched reference rows are optional sections that never influence which
//! candidates are reported.

use crate::detect::MatchCandidate;
use crate::error::{CoreError, CoreResult};
use crate::matcher::{MatchOutcome, MatchType};
use crate::record::Dataset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which optional sections to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportOptions {
    /// Include overall totals per side
    #[serde(default = "default_show_totals")]
    pub show_totals: bool,

    /// List reference rows that no enabled strategy matched
    #[serde(default)]
    pub show_unmatched: bool,
}

fn default_show_totals() -> bool {
    true
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_totals: default_show_totals(),
            show_unmatched: false,
        }
    }
}

/// Per-strategy roll-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategySummary {
    pub match_type: MatchType,
    /// Matched groups, including those in agreement
    pub groups: usize,
    /// Groups reported as discrepancies
    pub discrepancies: usize,
    pub impressions_delta: i64,
    pub clicks_delta: i64,
}

/// Overall sums of both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub reference_impressions: i64,
    pub reference_clicks: i64,
    pub source_impressions: i64,
    pub source_clicks: i64,
    pub impressions_delta: i64,
    pub clicks_delta: i64,
}

impl Totals {
    fn compute(reference: &Dataset, source: &Dataset) -> CoreResult<Self> {
        let (ri, rc) = (reference.total_impressions()?, reference.total_clicks()?);
        let (si, sc) = (source.total_impressions()?, source.total_clicks()?);
        Ok(Self {
            reference_impressions: ri,
            reference_clicks: rc,
            source_impressions: si,
            source_clicks: sc,
            impressions_delta: si
                .checked_sub(ri)
                .ok_or_else(|| CoreError::overflow("total impressions delta"))?,
            clicks_delta: sc
                .checked_sub(rc)
                .ok_or_else(|| CoreError::overflow("total clicks delta"))?,
        })
    }
}

fn sum_deltas<'a>(
    candidates: impl Iterator<Item = &'a MatchCandidate>,
    delta: impl Fn(&MatchCandidate) -> i64,
    what: impl FnOnce() -> String,
) -> CoreResult<i64> {
    candidates
        .map(delta)
        .try_fold(0i64, i64::checked_add)
        .ok_or_else(|| CoreError::overflow(what()))
}

/// A reference row no strategy matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedRow {
    pub row: usize,
    pub identifier: Option<String>,
    pub display_name: Option<String>,
    pub impressions: i64,
    pub clicks: i64,
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub reference_dataset: String,
    pub source_dataset: String,
    pub reference_rows: usize,
    pub source_rows: usize,
    pub matched_reference_rows: usize,
    pub discrepancies: usize,
    /// Impressions delta with the largest magnitude, sign preserved
    pub largest_impressions_delta: Option<i64>,
}

/// Full report for one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    /// Every candidate in ranked order
    pub candidates: Vec<MatchCandidate>,
    /// IdMatch candidates in ranked order
    pub id_mismatches: Vec<MatchCandidate>,
    /// IdInNameMatch and PrefixNameMatch candidates in ranked order
    pub name_discrepancies: Vec<MatchCandidate>,
    pub strategies: Vec<StrategySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_reference: Option<Vec<UnmatchedRow>>,
}

impl ComparisonReport {
    /// Assemble the report from a finished run.
    ///
    /// Fails if a total or a per-strategy delta sum leaves the i64 range.
    pub fn build(
        reference: &Dataset,
        source: &Dataset,
        outcome: &MatchOutcome,
        candidates: Vec<MatchCandidate>,
        options: &ReportOptions,
    ) -> CoreResult<Self> {
        let (id_mismatches, name_discrepancies): (Vec<_>, Vec<_>) = candidates
            .iter()
            .cloned()
            .partition(|c| c.match_type == MatchType::IdMatch);

        let strategies = outcome
            .strategies
            .iter()
            .map(|&mt| -> CoreResult<StrategySummary> {
                let found: Vec<&MatchCandidate> =
                    candidates.iter().filter(|c| c.match_type == mt).collect();
                Ok(StrategySummary {
                    match_type: mt,
                    groups: outcome.groups_for(mt).count(),
                    discrepancies: found.len(),
                    impressions_delta: sum_deltas(
                        found.iter().copied(),
                        |c| c.impressions_delta,
                        || format!("{mt} impressions delta sum"),
                    )?,
                    clicks_delta: sum_deltas(
                        found.iter().copied(),
                        |c| c.clicks_delta,
                        || format!("{mt} clicks delta sum"),
                    )?,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let totals = if options.show_totals {
            Some(Totals::compute(reference, source)?)
        } else {
            None
        };

        let unmatched_reference = options.show_unmatched.then(|| {
            reference
                .records
                .iter()
                .filter(|r| !outcome.matched_reference_rows.contains(&r.row))
                .map(|r| UnmatchedRow {
                    row: r.row,
                    identifier: r.identifier.clone(),
                    display_name: r.display_name.clone(),
                    impressions: r.impressions,
                    clicks: r.clicks,
                })
                .collect()
        });

        let summary = Summary {
            reference_dataset: reference.name.clone(),
            source_dataset: source.name.clone(),
            reference_rows: reference.len(),
            source_rows: source.len(),
            matched_reference_rows: outcome.matched_reference_rows.len(),
            discrepancies: candidates.len(),
            largest_impressions_delta: candidates
                .iter()
                .map(|c| c.impressions_delta)
                .max_by_key(|d| d.unsigned_abs()),
        };

        Ok(Self {
            generated_at: Utc::now(),
            summary,
            candidates,
            id_mismatches,
            name_discrepancies,
            strategies,
            totals,
            unmatched_reference,
        })
    }

    /// Whether any discrepancy was found.
    pub fn has_discrepancies(&self) -> bool {
        !self.candidates.is_empty()
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
