//! In-memory evaluation of match strategies.

use super::{strategy_for, MatchGroup, MatchOutcome, MatchStrategy, MatchType};
use crate::error::CoreResult;
use crate::record::Dataset;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

/// Evaluates strategies over two in-memory datasets.
#[derive(Debug, Clone)]
pub struct InMemoryMatcher {
    strategies: Vec<MatchType>,
    parallel: bool,
}

impl Default for InMemoryMatcher {
    fn default() -> Self {
        Self::new(&MatchType::ALL, true)
    }
}

impl InMemoryMatcher {
    /// Create a matcher for the given strategies. Order and duplicates in
    /// `strategies` do not matter.
    pub fn new(strategies: &[MatchType], parallel: bool) -> Self {
        Self {
            strategies: MatchType::canonical(strategies),
            parallel,
        }
    }

    /// Strategies this matcher evaluates, in concatenation order.
    pub fn strategies(&self) -> &[MatchType] {
        &self.strategies
    }

    /// Run every strategy and merge the results in concatenation order.
    pub fn run(&self, reference: &Dataset, source: &Dataset) -> CoreResult<MatchOutcome> {
        let start = Instant::now();
        let evaluate = |mt: &MatchType| evaluate_strategy(strategy_for(*mt), reference, source);

        // Indexed parallel collect keeps the input order.
        let results: Vec<(Vec<MatchGroup>, BTreeSet<usize>)> = if self.parallel {
            self.strategies.par_iter().map(evaluate).collect::<CoreResult<_>>()?
        } else {
            self.strategies.iter().map(evaluate).collect::<CoreResult<_>>()?
        };

        let mut outcome = MatchOutcome {
            strategies: self.strategies.clone(),
            ..Default::default()
        };
        for (groups, matched) in results {
            outcome.groups.extend(groups);
            outcome.matched_reference_rows.extend(matched);
        }

        log::debug!(
            "Matched {} reference x {} source rows into {} groups in {}ms",
            reference.len(),
            source.len(),
            outcome.groups.len(),
            start.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

/// Evaluate one strategy as a grouped inner join.
///
/// Returns the groups in order of first reference row and the set of
/// reference rows that joined at least one source row. Sums are taken over
/// joined pairs, so reference rows collapsing into one group each contribute
/// their matching source rows. A source sum beyond `i64::MAX` is an error.
pub fn evaluate_strategy(
    strategy: &dyn MatchStrategy,
    reference: &Dataset,
    source: &Dataset,
) -> CoreResult<(Vec<MatchGroup>, BTreeSet<usize>)> {
    let match_type = strategy.match_type();
    let mut groups: Vec<MatchGroup> = Vec::new();
    let mut index: HashMap<(String, i64, i64), usize> = HashMap::new();
    let mut matched = BTreeSet::new();

    for r in &reference.records {
        let Some(label) = strategy.group_label(r) else {
            continue;
        };
        let mut slot: Option<usize> = None;

        for s in &source.records {
            if !strategy.matches(r, s) {
                continue;
            }
            let Some(source_label) = strategy.source_label(s) else {
                continue;
            };

            let idx = *slot.get_or_insert_with(|| {
                *index
                    .entry((label.to_string(), r.impressions, r.clicks))
                    .or_insert_with(|| {
                        groups.push(MatchGroup::open(
                            match_type,
                            label,
                            r.impressions,
                            r.clicks,
                            r.row,
                            source_label,
                        ));
                        groups.len() - 1
                    })
            });
            groups[idx].absorb(source_label, s.impressions, s.clicks)?;
            matched.insert(r.row);
        }
    }

    log::debug!("{}: {} groups", match_type, groups.len());
    Ok((groups, matched))
}
