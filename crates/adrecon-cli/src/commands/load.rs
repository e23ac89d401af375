//! Load command implementation

use adrecon_core::pipeline::normalize_pair;
use adrecon_core::{Namespace, RawDataset, SourceTag};
use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, LoadArgs};
use crate::commands::common::load_side;
use crate::context::RuntimeContext;

fn print_side(
    tag: SourceTag,
    csv: &str,
    raw: &RawDataset,
    namespace: &Namespace,
    clean_rows: usize,
) {
    println!(
        "  {:<6} {} -> {} -> {} ({} rows)",
        tag.label(),
        csv,
        namespace.raw_table(tag),
        namespace.clean_table(tag),
        clean_rows
    );
    println!("         columns: {}", raw.columns.join(", "));
}

/// Execute the load command
pub async fn execute(args: &LoadArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let namespace = match &args.namespace {
        Some(ns) => Namespace::new(ns)?,
        None => Namespace::generate(),
    };

    if ctx.is_ephemeral() {
        log::warn!("Database is :memory:, loaded tables are discarded on exit; pass --database to keep them");
    }

    let db = ctx.db.as_ref();
    let raw_gam = load_side(db, SourceTag::Gam, &args.gam, &namespace).await?;
    let raw_cm360 = load_side(db, SourceTag::Cm360, &args.cm360, &namespace).await?;

    let pair = normalize_pair(
        &raw_cm360,
        &raw_gam,
        ctx.config.schema_for(SourceTag::Cm360),
        ctx.config.schema_for(SourceTag::Gam),
        &ctx.config.normalize,
    )?;

    for (tag, dataset) in [
        (SourceTag::Cm360, &pair.reference),
        (SourceTag::Gam, &pair.source),
    ] {
        let table = namespace.clean_table(tag);
        db.store_dataset(&table, dataset)
            .await
            .with_context(|| format!("Failed to store {table}"))?;
    }

    let gam_rows = db.row_count(&namespace.clean_table(SourceTag::Gam)).await?;
    let cm360_rows = db.row_count(&namespace.clean_table(SourceTag::Cm360)).await?;

    println!("Loaded namespace '{}':\n", namespace);
    print_side(SourceTag::Gam, &args.gam, &raw_gam, &namespace, gam_rows);
    print_side(SourceTag::Cm360, &args.cm360, &raw_cm360, &namespace, cm360_rows);
    println!("\nDatabase: {}", ctx.config.database.path);

    log::info!(
        "Loaded {} {} rows and {} {} rows into namespace {}",
        gam_rows,
        SourceTag::Gam,
        cm360_rows,
        SourceTag::Cm360,
        namespace
    );
    Ok(())
}
