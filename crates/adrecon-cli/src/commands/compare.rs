//! Compare command implementation

use adrecon_core::pipeline::{compare, normalize_pair};
use adrecon_core::{detect, ComparisonReport, Config, Engine, MatchType, Namespace, SourceTag};
use adrecon_db::SqlMatcher;
use anyhow::{Context, Result};

use crate::cli::{CompareArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{drop_namespace, fetch_side, load_side, ExitCode, EXIT_DISCREPANCIES};
use crate::commands::render::{render_json, render_text};
use crate::context::RuntimeContext;

/// Fold command-line overrides into the loaded configuration.
fn apply_overrides(config: &mut Config, args: &CompareArgs) -> Result<()> {
    if let Some(engine) = args.engine {
        config.matching.engine = engine.into();
    }
    if let Some(strategies) = &args.strategies {
        config.matching.strategies = strategies.iter().map(|&s| MatchType::from(s)).collect();
    }
    if args.unmatched {
        config.report.show_unmatched = true;
    }
    if args.no_totals {
        config.report.show_totals = false;
    }
    config.validate().context("Invalid comparison settings")?;
    Ok(())
}

/// Execute the compare command
pub async fn execute(args: &CompareArgs, global: &GlobalArgs) -> Result<()> {
    let mut ctx = RuntimeContext::new(global)?;
    apply_overrides(&mut ctx.config, args)?;
    let config = &ctx.config;
    let db = ctx.db.as_ref();

    // Tables of a generated namespace are scratch space for this run.
    let (namespace, scratch) = match &args.namespace {
        Some(ns) => (Namespace::new(ns)?, false),
        None => (Namespace::generate(), true),
    };

    let result = async {
        let (raw_gam, raw_cm360) = match (&args.gam, &args.cm360) {
            (Some(gam), Some(cm360)) => (
                load_side(db, SourceTag::Gam, gam, &namespace).await?,
                load_side(db, SourceTag::Cm360, cm360, &namespace).await?,
            ),
            _ => (
                fetch_side(db, SourceTag::Gam, &namespace).await?,
                fetch_side(db, SourceTag::Cm360, &namespace).await?,
            ),
        };

        let pair = normalize_pair(
            &raw_cm360,
            &raw_gam,
            config.schema_for(SourceTag::Cm360),
            config.schema_for(SourceTag::Gam),
            &config.normalize,
        )?;

        let (outcome, candidates) = match config.matching.engine {
            Engine::Memory => compare(&pair.reference, &pair.source, &config.matching)?,
            Engine::DuckDb => {
                let outcome = SqlMatcher::new(db, &config.matching.strategies)
                    .run(&pair.reference, &pair.source, &namespace)
                    .await
                    .context("SQL match engine failed")?;
                let candidates = detect(&outcome.groups)?;
                (outcome, candidates)
            }
        };
        log::info!(
            "{} engine: {} groups, {} discrepancies",
            config.matching.engine,
            outcome.groups.len(),
            candidates.len()
        );

        let report = ComparisonReport::build(
            &pair.reference,
            &pair.source,
            &outcome,
            candidates,
            &config.report,
        )?;
        Ok::<_, anyhow::Error>(report)
    }
    .await;

    if scratch {
        if let Err(e) = drop_namespace(db, &namespace).await {
            log::warn!("Failed to drop scratch tables of {}: {:#}", namespace, e);
        }
    }
    let report = result?;

    match args.format {
        OutputFormat::Text => println!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    if args.fail_on_discrepancy && report.has_discrepancies() {
        return Err(ExitCode(EXIT_DISCREPANCIES).into());
    }
    Ok(())
}
