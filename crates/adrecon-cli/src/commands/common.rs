//! Shared utilities for CLI commands

use adrecon_core::{Namespace, RawDataset, SourceTag};
use adrecon_db::Database;
use anyhow::{Context, Result};
use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the database is closed cleanly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; never printed.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit status when `--fail-on-discrepancy` is set and discrepancies exist
pub(crate) const EXIT_DISCREPANCIES: u8 = 1;

/// Load one side's CSV into its raw namespace table and read it back.
///
/// The returned dataset is named after the file so data errors point at it.
pub(crate) async fn load_side(
    db: &dyn Database,
    tag: SourceTag,
    csv_path: &str,
    namespace: &Namespace,
) -> Result<RawDataset> {
    let table = namespace.raw_table(tag);
    db.load_csv_text(&table, csv_path)
        .await
        .with_context(|| format!("Failed to load {tag} export {csv_path}"))?;
    let mut raw = fetch_side(db, tag, namespace).await?;
    raw.name = csv_path.to_string();
    Ok(raw)
}

/// Read one side's raw namespace table.
pub(crate) async fn fetch_side(
    db: &dyn Database,
    tag: SourceTag,
    namespace: &Namespace,
) -> Result<RawDataset> {
    let table = namespace.raw_table(tag);
    db.fetch_raw(&table)
        .await
        .with_context(|| format!("Failed to read {tag} table {table}"))
}

/// Drop every table of a namespace.
pub(crate) async fn drop_namespace(db: &dyn Database, namespace: &Namespace) -> Result<()> {
    for tag in [SourceTag::Gam, SourceTag::Cm360] {
        db.drop_if_exists(&namespace.raw_table(tag)).await?;
        db.drop_if_exists(&namespace.clean_table(tag)).await?;
    }
    Ok(())
}
