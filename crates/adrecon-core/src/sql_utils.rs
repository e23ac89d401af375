//! SQL identifier quoting utilities
//!
//! Dataset tables are named from caller-supplied namespaces, so every
//! identifier and literal spliced into generated SQL goes through here.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and doubles any embedded double
/// quotes, following the SQL standard.
///
/// # Examples
/// ```
/// use adrecon_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("gam_run1"), r#""gam_run1""#);
/// assert_eq!(quote_ident(r#"Creative "ID""#), r#""Creative ""ID""""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Split a potentially schema-qualified table name into (schema, table).
///
/// Uses the last `.` as the separator and defaults the schema to `main`.
///
/// # Examples
/// ```
/// use adrecon_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("cm360_run1"), ("main", "cm360_run1"));
/// assert_eq!(split_qualified_name("staging.cm360_run1"), ("staging", "cm360_run1"));
/// ```
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
