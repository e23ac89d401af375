//! The three-stage comparison: normalize, match, detect.
//!
//! Both raw datasets are checked against their schema declarations before
//! either is parsed, so a missing column on one side is reported even when
//! the other side holds unparsable data.

use crate::config::{Config, MatchingConfig};
use crate::detect::{detect, MatchCandidate};
use crate::error::CoreResult;
use crate::matcher::{InMemoryMatcher, MatchOutcome};
use crate::normalize::{normalize, NormalizeOptions};
use crate::record::{Dataset, RawDataset, SourceTag};
use crate::report::ComparisonReport;
use crate::schema::SideSchema;
use std::time::Instant;

/// A normalized (reference, source) pair.
#[derive(Debug, Clone)]
pub struct DatasetPair {
    /// CM360 side
    pub reference: Dataset,
    /// GAM side
    pub source: Dataset,
}

/// Normalize both sides.
pub fn normalize_pair(
    raw_reference: &RawDataset,
    raw_source: &RawDataset,
    reference_schema: &SideSchema,
    source_schema: &SideSchema,
    options: &NormalizeOptions,
) -> CoreResult<DatasetPair> {
    reference_schema.resolve(raw_reference)?;
    source_schema.resolve(raw_source)?;

    let reference = normalize(raw_reference, reference_schema, SourceTag::Cm360, options)?;
    let source = normalize(raw_source, source_schema, SourceTag::Gam, options)?;
    Ok(DatasetPair { reference, source })
}

/// Match and detect over normalized data with the in-memory engine.
pub fn compare(
    reference: &Dataset,
    source: &Dataset,
    matching: &MatchingConfig,
) -> CoreResult<(MatchOutcome, Vec<MatchCandidate>)> {
    let matcher = InMemoryMatcher::new(&matching.strategies, matching.parallel);
    let outcome = matcher.run(reference, source)?;
    let candidates = detect(&outcome.groups)?;
    Ok((outcome, candidates))
}

/// Run the whole pipeline over raw datasets and build the report.
pub fn run(
    raw_reference: &RawDataset,
    raw_source: &RawDataset,
    config: &Config,
) -> CoreResult<ComparisonReport> {
    let start = Instant::now();
    let pair = normalize_pair(
        raw_reference,
        raw_source,
        config.schema_for(SourceTag::Cm360),
        config.schema_for(SourceTag::Gam),
        &config.normalize,
    )?;

    let (outcome, candidates) = compare(&pair.reference, &pair.source, &config.matching)?;
    let report = ComparisonReport::build(
        &pair.reference,
        &pair.source,
        &outcome,
        candidates,
        &config.report,
    )?;

    log::info!(
        "Compared {} {} rows with {} {} rows: {} discrepancies in {}ms",
        pair.reference.len(),
        SourceTag::Cm360,
        pair.source.len(),
        SourceTag::Gam,
        report.summary.discrepancies,
        start.elapsed().as_millis()
    );
    Ok(report)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
