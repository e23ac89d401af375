//! CSV files through DuckDB into the reconciliation pipeline

use adrecon_core::pipeline::{compare, normalize_pair, run};
use adrecon_core::{Config, CoreError, MatchType, Namespace, SourceTag};
use adrecon_db::{Database, DuckDbBackend, SqlMatcher};
use std::path::Path;

const GAM_CSV: &str = "\
creative_id,creative_name,impressions,clicks
P1,\"Campaign_P1_Banner, v2\",600,5
P1,Other,\"1,500\",6
Y1,Promo – Ünïcode_300,200,2
";

const CM360_CSV: &str = "\
placement_id,placement_name,impressions,clicks
P1,\"Campaign_P1_Banner, v2\",1000,10
X9,Promo – Ünïcode,200,2
";

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

async fn load_pair(db: &DuckDbBackend, ns: &Namespace, gam: &str, cm360: &str) {
    db.load_csv_text(&ns.raw_table(SourceTag::Gam), gam)
        .await
        .unwrap();
    db.load_csv_text(&ns.raw_table(SourceTag::Cm360), cm360)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_csv_round_trip_preserves_commas_and_multibyte_text() {
    let dir = tempfile::tempdir().unwrap();
    let gam = write(dir.path(), "gam.csv", GAM_CSV);
    let cm360 = write(dir.path(), "cm360.csv", CM360_CSV);

    let db = DuckDbBackend::in_memory().unwrap();
    let ns = Namespace::new("roundtrip").unwrap();
    load_pair(&db, &ns, &gam, &cm360).await;

    let raw_gam = db.fetch_raw(&ns.raw_table(SourceTag::Gam)).await.unwrap();
    assert_eq!(raw_gam.rows[0][1].as_deref(), Some("Campaign_P1_Banner, v2"));
    assert_eq!(raw_gam.rows[2][1].as_deref(), Some("Promo – Ünïcode_300"));

    let raw_cm360 = db.fetch_raw(&ns.raw_table(SourceTag::Cm360)).await.unwrap();
    let report = run(&raw_cm360, &raw_gam, &Config::default()).unwrap();

    let id = &report.id_mismatches[0];
    assert_eq!(id.reference_identifier, "P1");
    assert_eq!(id.aggregated_source_impressions, 2100);
    assert_eq!(id.impressions_delta, 1100);

    // The multi-byte prefix pair agrees and is suppressed.
    assert!(report
        .candidates
        .iter()
        .all(|c| c.reference_identifier != "Promo – Ünïcode"));
}

#[tokio::test]
async fn test_missing_mapped_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let gam = write(
        dir.path(),
        "gam.csv",
        "creative_id,creative_name,impressions\nP1,A,10\n",
    );
    let cm360 = write(dir.path(), "cm360.csv", CM360_CSV);

    let db = DuckDbBackend::in_memory().unwrap();
    let ns = Namespace::new("schema").unwrap();
    load_pair(&db, &ns, &gam, &cm360).await;

    let raw_gam = db.fetch_raw(&ns.raw_table(SourceTag::Gam)).await.unwrap();
    let raw_cm360 = db.fetch_raw(&ns.raw_table(SourceTag::Cm360)).await.unwrap();
    let err = run(&raw_cm360, &raw_gam, &Config::default()).unwrap_err();

    match err {
        CoreError::Schema { dataset, column } => {
            assert_eq!(dataset, "gam_schema");
            assert_eq!(column, "clicks");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_engines_agree_on_loaded_csvs() {
    let dir = tempfile::tempdir().unwrap();
    let gam = write(dir.path(), "gam.csv", GAM_CSV);
    let cm360 = write(dir.path(), "cm360.csv", CM360_CSV);

    let db = DuckDbBackend::in_memory().unwrap();
    let ns = Namespace::generate();
    load_pair(&db, &ns, &gam, &cm360).await;

    let config = Config::default();
    let pair = normalize_pair(
        &db.fetch_raw(&ns.raw_table(SourceTag::Cm360)).await.unwrap(),
        &db.fetch_raw(&ns.raw_table(SourceTag::Gam)).await.unwrap(),
        &config.cm360,
        &config.gam,
        &config.normalize,
    )
    .unwrap();

    let (memory, _) = compare(&pair.reference, &pair.source, &config.matching).unwrap();
    let sql = SqlMatcher::new(&db, &MatchType::ALL)
        .run(&pair.reference, &pair.source, &ns)
        .await
        .unwrap();

    assert_eq!(sql, memory);
    assert_eq!(
        db.row_count(&ns.clean_table(SourceTag::Gam)).await.unwrap(),
        3
    );
}
