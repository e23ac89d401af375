use super::*;
use crate::detect::detect;
use crate::matcher::InMemoryMatcher;
use crate::record::{Record, SourceTag};

fn reference() -> Dataset {
    Dataset::new(
        "cm360.csv",
        SourceTag::Cm360,
        vec![
            Record::new(SourceTag::Cm360, 1, "P1", "Spring_A", 1000, 10),
            Record::new(SourceTag::Cm360, 2, "P2", "Summer", 500, 5),
            Record::new(SourceTag::Cm360, 3, "P9", "Orphan", 70, 7),
        ],
    )
}

fn source() -> Dataset {
    Dataset::new(
        "gam.csv",
        SourceTag::Gam,
        vec![
            Record::new(SourceTag::Gam, 1, "P1", "Spring_A_300x250", 600, 6),
            Record::new(SourceTag::Gam, 2, "P1", "Spring_A_728x90", 300, 4),
            Record::new(SourceTag::Gam, 3, "P2", "Summer_P2", 500, 5),
        ],
    )
}

fn build(options: &ReportOptions) -> ComparisonReport {
    let (r, s) = (reference(), source());
    let outcome = InMemoryMatcher::new(&MatchType::ALL, false).run(&r, &s).unwrap();
    let candidates = detect(&outcome.groups).unwrap();
    ComparisonReport::build(&r, &s, &outcome, candidates, options).unwrap()
}

#[test]
fn test_sections_split_by_strategy() {
    let report = build(&ReportOptions::default());

    assert!(report.has_discrepancies());
    assert!(report
        .id_mismatches
        .iter()
        .all(|c| c.match_type == MatchType::IdMatch));
    assert!(report
        .name_discrepancies
        .iter()
        .all(|c| c.match_type != MatchType::IdMatch));
    assert_eq!(
        report.id_mismatches.len() + report.name_discrepancies.len(),
        report.candidates.len()
    );
    assert_eq!(report.summary.discrepancies, report.candidates.len());
}

#[test]
fn test_strategy_summary_counts_groups_and_discrepancies() {
    let report = build(&ReportOptions::default());
    let id = report
        .strategies
        .iter()
        .find(|s| s.match_type == MatchType::IdMatch)
        .unwrap();

    // P1 disagrees (-100, 0), P2 agrees.
    assert_eq!(id.groups, 2);
    assert_eq!(id.discrepancies, 1);
    assert_eq!(id.impressions_delta, -100);
    assert_eq!(id.clicks_delta, 0);
    assert_eq!(report.strategies.len(), 3);
}

#[test]
fn test_totals_and_unmatched_sections() {
    let report = build(&ReportOptions {
        show_totals: true,
        show_unmatched: true,
    });

    let totals = report.totals.as_ref().unwrap();
    assert_eq!(totals.reference_impressions, 1570);
    assert_eq!(totals.source_impressions, 1400);
    assert_eq!(totals.impressions_delta, -170);
    assert_eq!(totals.clicks_delta, -7);

    let unmatched = report.unmatched_reference.as_ref().unwrap();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].row, 3);
    assert_eq!(unmatched[0].identifier.as_deref(), Some("P9"));
    assert_eq!(report.summary.matched_reference_rows, 2);
}

#[test]
fn test_optional_sections_omitted() {
    let report = build(&ReportOptions {
        show_totals: false,
        show_unmatched: false,
    });
    assert!(report.totals.is_none());
    assert!(report.unmatched_reference.is_none());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("totals").is_none());
    assert!(json.get("unmatched_reference").is_none());
    assert_eq!(json["summary"]["reference_rows"], 3);
}

#[test]
fn test_largest_delta_keeps_sign() {
    let report = build(&ReportOptions::default());
    assert_eq!(report.summary.largest_impressions_delta, Some(-100));
}

#[test]
fn test_empty_run_has_no_discrepancies() {
    let r = Dataset::new("cm360.csv", SourceTag::Cm360, Vec::new());
    let s = Dataset::new("gam.csv", SourceTag::Gam, Vec::new());
    let outcome = InMemoryMatcher::default().run(&r, &s).unwrap();
    let report =
        ComparisonReport::build(&r, &s, &outcome, Vec::new(), &ReportOptions::default()).unwrap();

    assert!(!report.has_discrepancies());
    assert_eq!(report.summary.largest_impressions_delta, None);
    assert_eq!(report.strategies.iter().map(|s| s.groups).sum::<usize>(), 0);
}

#[test]
fn test_strategy_delta_sum_overflow_is_an_error() {
    let r = Dataset::new(
        "cm360.csv",
        SourceTag::Cm360,
        vec![
            Record::new(SourceTag::Cm360, 1, "P1", "A", 0, 0),
            Record::new(SourceTag::Cm360, 2, "P2", "B", 0, 0),
        ],
    );
    let s = Dataset::new(
        "gam.csv",
        SourceTag::Gam,
        vec![
            Record::new(SourceTag::Gam, 1, "P1", "x", i64::MAX, 0),
            Record::new(SourceTag::Gam, 2, "P2", "y", i64::MAX, 0),
        ],
    );
    let outcome = InMemoryMatcher::new(&[MatchType::IdMatch], false)
        .run(&r, &s)
        .unwrap();
    let candidates = detect(&outcome.groups).unwrap();
    assert_eq!(candidates.len(), 2);

    let options = ReportOptions {
        show_totals: false,
        show_unmatched: false,
    };
    let err = ComparisonReport::build(&r, &s, &outcome, candidates, &options).unwrap_err();
    assert!(err.to_string().contains("IdMatch impressions delta sum"), "{err}");
}
