use super::*;

#[test]
fn test_default_layouts() {
    assert_eq!(
        SideSchema::gam().columns(),
        ["creative_id", "creative_name", "impressions", "clicks"]
    );
    assert_eq!(
        SideSchema::default_for(SourceTag::Cm360).columns(),
        ["placement_id", "placement_name", "impressions", "clicks"]
    );
}

#[test]
fn test_resolve_finds_columns_in_any_order() {
    let raw = RawDataset::from_text(
        "cm360.csv",
        &["clicks", "placement_name", "extra", "impressions", "placement_id"],
        &[],
    );
    let idx = SideSchema::cm360().resolve(&raw).unwrap();
    assert_eq!(
        idx,
        ColumnIndices {
            identifier: 4,
            display_name: 1,
            impressions: 3,
            clicks: 0,
        }
    );
}

#[test]
fn test_resolve_missing_column_is_schema_error() {
    let raw = RawDataset::from_text(
        "gam.csv",
        &["creative_id", "creative_name", "impressions"],
        &[],
    );
    let err = SideSchema::gam().resolve(&raw).unwrap_err();
    match err {
        CoreError::Schema { dataset, column } => {
            assert_eq!(dataset, "gam.csv");
            assert_eq!(column, "clicks");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_column_match_is_case_sensitive() {
    let raw = RawDataset::from_text(
        "gam.csv",
        &["Creative_ID", "creative_name", "impressions", "clicks"],
        &[],
    );
    assert!(SideSchema::gam().resolve(&raw).is_err());
}

#[test]
fn test_validate_rejects_duplicate_roles() {
    let schema = SideSchema {
        identifier_column: "id".to_string(),
        display_name_column: "id".to_string(),
        impressions_column: "impressions".to_string(),
        clicks_column: "clicks".to_string(),
    };
    let err = schema.validate(SourceTag::Gam).unwrap_err();
    assert!(err.to_string().contains("more than one role"));
}

#[test]
fn test_validate_rejects_empty_names() {
    let schema = SideSchema {
        clicks_column: "  ".to_string(),
        ..SideSchema::cm360()
    };
    let err = schema.validate(SourceTag::Cm360).unwrap_err();
    assert!(err.to_string().contains("CM360 clicks column"));
}

#[test]
fn test_partial_yaml_defaults_metric_columns() {
    let schema: SideSchema =
        serde_yaml::from_str("identifier_column: Ad ID\ndisplay_name_column: Ad").unwrap();
    assert_eq!(schema.impressions_column, "impressions");
    assert_eq!(schema.clicks_column, "clicks");
}
