//! Query command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat, QueryArgs};
use crate::commands::render::{render_query_json, render_query_text};
use crate::context::RuntimeContext;

/// Execute the query command
pub async fn execute(args: &QueryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let result = ctx.db.query(&args.sql).await.context("Query failed")?;

    match args.format {
        OutputFormat::Text => println!("{}", render_query_text(&result)),
        OutputFormat::Json => println!("{}", render_query_json(&result)?),
    }
    Ok(())
}
