use super::*;

fn gam_raw(rows: &[&[&str]]) -> RawDataset {
    RawDataset::from_text(
        "gam.csv",
        &["creative_id", "creative_name", "impressions", "clicks"],
        rows,
    )
}

#[test]
fn test_parse_count_strips_separators() {
    assert_eq!(parse_count("1,234"), Some(1234));
    assert_eq!(parse_count("1,234,567"), Some(1_234_567));
    assert_eq!(parse_count("0"), Some(0));
    assert_eq!(parse_count(" 42 "), Some(42));
}

#[test]
fn test_parse_count_rejects_non_integers() {
    assert_eq!(parse_count(""), None);
    assert_eq!(parse_count(","), None);
    assert_eq!(parse_count("12.5"), None);
    assert_eq!(parse_count("-3"), None);
    assert_eq!(parse_count("+3"), None);
    assert_eq!(parse_count("1 234"), None);
    assert_eq!(parse_count("n/a"), None);
    assert_eq!(parse_count("99999999999999999999"), None);
}

#[test]
fn test_normalize_basic_rows() {
    let raw = gam_raw(&[&["C1", "Spring Banner", "1,000", "12"], &["C2", "Video", "0", "0"]]);
    let dataset = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap();

    assert_eq!(dataset.len(), 2);
    let first = &dataset.records[0];
    assert_eq!(first.row, 1);
    assert_eq!(first.tag, SourceTag::Gam);
    assert_eq!(first.identifier.as_deref(), Some("C1"));
    assert_eq!(first.display_name.as_deref(), Some("Spring Banner"));
    assert_eq!(first.impressions, 1000);
    assert_eq!(first.clicks, 12);
    assert_eq!(dataset.records[1].row, 2);
}

#[test]
fn test_normalize_preserves_text_characters() {
    let raw = gam_raw(&[&["C-ü1", "Sale, 50% off — ☀", "1", "0"]]);
    let dataset = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap();
    assert_eq!(
        dataset.records[0].display_name.as_deref(),
        Some("Sale, 50% off — ☀")
    );
    assert_eq!(dataset.records[0].identifier.as_deref(), Some("C-ü1"));
}

#[test]
fn test_normalize_trim_option() {
    let raw = gam_raw(&[&["  C1 ", " Banner  ", "5", "1"]]);

    let trimmed = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap();
    assert_eq!(trimmed.records[0].identifier.as_deref(), Some("C1"));

    let options = NormalizeOptions { trim_text: false };
    let untouched = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &options).unwrap();
    assert_eq!(untouched.records[0].identifier.as_deref(), Some("  C1 "));
    assert_eq!(untouched.records[0].display_name.as_deref(), Some(" Banner  "));
}

#[test]
fn test_normalize_blank_text_becomes_absent() {
    let mut raw = gam_raw(&[&["   ", "Banner", "5", "1"]]);
    raw.push_row(vec![None, None, Some("7".to_string()), Some("0".to_string())]);

    let dataset = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap();
    assert_eq!(dataset.records[0].identifier, None);
    assert_eq!(dataset.records[1].identifier, None);
    assert_eq!(dataset.records[1].display_name, None);
}

#[test]
fn test_normalize_empty_numeric_is_parse_error() {
    let raw = gam_raw(&[&["C1", "Banner", "10", "1"], &["C2", "Video", "", "3"]]);
    let err = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap_err();
    match err {
        CoreError::Parse {
            dataset,
            column,
            row,
            value,
        } => {
            assert_eq!(dataset, "gam.csv");
            assert_eq!(column, "impressions");
            assert_eq!(row, 2);
            assert_eq!(value, "");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_normalize_null_numeric_is_parse_error() {
    let mut raw = gam_raw(&[]);
    raw.push_row(vec![
        Some("C1".to_string()),
        Some("Banner".to_string()),
        Some("10".to_string()),
        None,
    ]);
    let err = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap_err();
    assert!(matches!(err, CoreError::Parse { ref column, .. } if column == "clicks"));
}

#[test]
fn test_normalize_reports_raw_value() {
    let raw = gam_raw(&[&["C1", "Banner", "$1,200", "1"]]);
    let err = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap_err();
    assert!(err.to_string().contains("\"$1,200\""));
    assert!(err.is_data_error());
}

#[test]
fn test_normalize_missing_column_fails_before_rows() {
    let raw = RawDataset::from_text(
        "gam.csv",
        &["creative_id", "creative_name", "clicks"],
        &[&["C1", "Banner", "not a number"]],
    );
    let err = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap_err();
    assert!(matches!(err, CoreError::Schema { ref column, .. } if column == "impressions"));
}

#[test]
fn test_normalize_empty_dataset() {
    let raw = gam_raw(&[]);
    let dataset = normalize(&raw, &SideSchema::gam(), SourceTag::Gam, &Default::default()).unwrap();
    assert!(dataset.is_empty());
}
