use super::*;

fn group(mt: MatchType, key: &str, reference: (i64, i64), source: (i64, i64)) -> MatchGroup {
    MatchGroup {
        match_type: mt,
        reference_key: key.to_string(),
        source_representative: format!("src-{key}"),
        reference_impressions: reference.0,
        reference_clicks: reference.1,
        source_impressions: source.0,
        source_clicks: source.1,
        matched_pairs: 1,
        first_reference_row: 1,
    }
}

#[test]
fn test_from_group_signed_deltas() {
    let c = MatchCandidate::from_group(&group(MatchType::IdMatch, "P1", (1000, 10), (900, 12)))
        .unwrap();
    assert_eq!(c.impressions_delta, -100);
    assert_eq!(c.clicks_delta, 2);
    assert_eq!(c.reference_identifier, "P1");
    assert_eq!(c.source_identifier, "src-P1");
    assert_eq!(c.aggregated_source_impressions, 900);
}

#[test]
fn test_zero_delta_groups_suppressed() {
    let groups = vec![
        group(MatchType::IdMatch, "same", (10, 1), (10, 1)),
        group(MatchType::IdMatch, "clicks_only", (10, 1), (10, 2)),
        group(MatchType::PrefixNameMatch, "impr_only", (10, 1), (11, 1)),
    ];
    let out = detect(&groups).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(MatchCandidate::is_discrepancy));
    assert!(out.iter().all(|c| c.reference_identifier != "same"));
}

#[test]
fn test_sorted_by_impressions_then_clicks_descending() {
    let groups = vec![
        group(MatchType::IdMatch, "a", (100, 10), (90, 10)),
        group(MatchType::IdMatch, "b", (100, 10), (150, 10)),
        group(MatchType::IdInNameMatch, "c", (100, 10), (150, 15)),
        group(MatchType::PrefixNameMatch, "d", (100, 10), (100, 5)),
    ];
    let keys: Vec<String> = detect(&groups).unwrap()
        .into_iter()
        .map(|c| c.reference_identifier)
        .collect();
    assert_eq!(keys, vec!["c", "b", "d", "a"]);
}

#[test]
fn test_exact_ties_keep_strategy_order() {
    // Input deliberately lists the prefix group first.
    let groups = vec![
        group(MatchType::PrefixNameMatch, "prefix", (0, 0), (5, 1)),
        group(MatchType::IdInNameMatch, "in_name", (0, 0), (5, 1)),
        group(MatchType::IdMatch, "id", (0, 0), (5, 1)),
        group(MatchType::IdMatch, "id_second", (0, 0), (5, 1)),
    ];
    let out = detect(&groups).unwrap();
    let order: Vec<(MatchType, &str)> = out
        .iter()
        .map(|c| (c.match_type, c.reference_identifier.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (MatchType::IdMatch, "id"),
            (MatchType::IdMatch, "id_second"),
            (MatchType::IdInNameMatch, "in_name"),
            (MatchType::PrefixNameMatch, "prefix"),
        ]
    );
}

#[test]
fn test_detect_empty() {
    assert!(detect(&[]).unwrap().is_empty());
}

#[test]
fn test_candidate_json_shape() {
    let c = MatchCandidate::from_group(&group(MatchType::IdInNameMatch, "P7", (5, 0), (7, 1)))
        .unwrap();
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["match_type"], "id_in_name_match");
    assert_eq!(json["impressions_delta"], 2);
    assert_eq!(json["clicks_delta"], 1);
}
