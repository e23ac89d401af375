use super::*;

#[test]
fn test_quote_ident_plain_table() {
    assert_eq!(quote_ident("gam_abc123"), r#""gam_abc123""#);
}

#[test]
fn test_quote_ident_column_with_spaces() {
    assert_eq!(quote_ident("Placement ID"), r#""Placement ID""#);
}

#[test]
fn test_quote_ident_embedded_quotes() {
    assert_eq!(quote_ident(r#"a"b"#), r#""a""b""#);
}

#[test]
fn test_split_qualified_defaults_to_main() {
    assert_eq!(split_qualified_name("gam_x"), ("main", "gam_x"));
}

#[test]
fn test_split_qualified_uses_last_dot() {
    assert_eq!(split_qualified_name("db.reports.gam_x"), ("db.reports", "gam_x"));
}

#[test]
fn test_escape_sql_string_paths() {
    assert_eq!(
        escape_sql_string("/tmp/o'brien/gam.csv"),
        "/tmp/o''brien/gam.csv"
    );
    assert_eq!(escape_sql_string("plain.csv"), "plain.csv");
}
