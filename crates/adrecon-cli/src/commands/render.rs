//! Text and JSON rendering of reports and query results.

use adrecon_core::report::{StrategySummary, Totals, UnmatchedRow};
use adrecon_core::{ComparisonReport, MatchCandidate, SourceTag};
use adrecon_db::QueryResult;
use anyhow::{Context, Result};
use chrono::SecondsFormat;

const CANDIDATE_HEADERS: [&str; 9] = [
    "match_type",
    "reference_identifier",
    "source_identifier",
    "reference_impressions",
    "aggregated_source_impressions",
    "impressions_delta",
    "reference_clicks",
    "aggregated_source_clicks",
    "clicks_delta",
];

const NO_DISCREPANCIES: &str = "No discrepancies found (0 rows returned).";

/// Calculate column widths in characters for a table given headers and rows.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Format a `|`-separated table with a header and a dashed rule.
pub(crate) fn pipe_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);
    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    out.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.extend(rows.iter().map(|row| line(row.clone())));
    out.join("\n")
}

fn candidate_row(c: &MatchCandidate) -> Vec<String> {
    vec![
        c.match_type.to_string(),
        c.reference_identifier.clone(),
        c.source_identifier.clone(),
        c.reference_impressions.to_string(),
        c.aggregated_source_impressions.to_string(),
        c.impressions_delta.to_string(),
        c.reference_clicks.to_string(),
        c.aggregated_source_clicks.to_string(),
        c.clicks_delta.to_string(),
    ]
}

fn candidate_section(title: &str, candidates: &[MatchCandidate]) -> String {
    let heading = format!("{} ({})", title, candidates.len());
    if candidates.is_empty() {
        return format!("{heading}\n{NO_DISCREPANCIES}");
    }
    let rows: Vec<Vec<String>> = candidates.iter().map(candidate_row).collect();
    format!("{heading}\n{}", pipe_table(&CANDIDATE_HEADERS, &rows))
}

fn strategy_section(strategies: &[StrategySummary]) -> String {
    let rows: Vec<Vec<String>> = strategies
        .iter()
        .map(|s| {
            vec![
                s.match_type.to_string(),
                s.groups.to_string(),
                s.discrepancies.to_string(),
                s.impressions_delta.to_string(),
                s.clicks_delta.to_string(),
            ]
        })
        .collect();
    format!(
        "Strategies\n{}",
        pipe_table(
            &[
                "strategy",
                "groups",
                "discrepancies",
                "impressions_delta",
                "clicks_delta"
            ],
            &rows
        )
    )
}

fn totals_section(totals: &Totals) -> String {
    let rows = vec![
        vec![
            SourceTag::Cm360.to_string(),
            totals.reference_impressions.to_string(),
            totals.reference_clicks.to_string(),
        ],
        vec![
            SourceTag::Gam.to_string(),
            totals.source_impressions.to_string(),
            totals.source_clicks.to_string(),
        ],
        vec![
            "delta".to_string(),
            totals.impressions_delta.to_string(),
            totals.clicks_delta.to_string(),
        ],
    ];
    format!(
        "Totals\n{}",
        pipe_table(&["side", "impressions", "clicks"], &rows)
    )
}

fn unmatched_section(rows: &[UnmatchedRow]) -> String {
    let heading = format!("Unmatched {} rows ({})", SourceTag::Cm360, rows.len());
    if rows.is_empty() {
        return heading;
    }
    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.row.to_string(),
                r.identifier.clone().unwrap_or_default(),
                r.display_name.clone().unwrap_or_default(),
                r.impressions.to_string(),
                r.clicks.to_string(),
            ]
        })
        .collect();
    format!(
        "{heading}\n{}",
        pipe_table(
            &["row", "identifier", "display_name", "impressions", "clicks"],
            &table_rows
        )
    )
}

/// Render a report as human-readable text.
pub(crate) fn render_text(report: &ComparisonReport) -> String {
    let s = &report.summary;
    let mut sections = vec![format!(
        "GAM vs CM360 reconciliation ({})\n{}: {} ({} rows)  {}: {} ({} rows)",
        report
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        SourceTag::Cm360,
        s.reference_dataset,
        s.reference_rows,
        SourceTag::Gam,
        s.source_dataset,
        s.source_rows,
    )];

    sections.push(candidate_section("ID mismatches", &report.id_mismatches));
    sections.push(candidate_section(
        "Name discrepancies",
        &report.name_discrepancies,
    ));
    sections.push(strategy_section(&report.strategies));
    if let Some(totals) = &report.totals {
        sections.push(totals_section(totals));
    }
    if let Some(unmatched) = &report.unmatched_reference {
        sections.push(unmatched_section(unmatched));
    }

    let largest = s
        .largest_impressions_delta
        .map_or_else(|| "n/a".to_string(), |d| d.to_string());
    sections.push(format!(
        "Summary\nMatched {} of {} {} rows. {} discrepancies; largest impressions delta: {}",
        s.matched_reference_rows,
        s.reference_rows,
        SourceTag::Cm360,
        s.discrepancies,
        largest
    ));

    sections.join("\n\n")
}

/// Render a report as pretty JSON.
pub(crate) fn render_json(report: &ComparisonReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Render an ad-hoc query result as a text table.
pub(crate) fn render_query_text(result: &QueryResult) -> String {
    if result.is_empty() {
        return "No rows returned.".to_string();
    }
    let headers: Vec<&str> = result.columns.iter().map(|s| s.as_str()).collect();
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.clone().unwrap_or_else(|| "NULL".to_string()))
                .collect()
        })
        .collect();
    format!(
        "{}\n\n({} rows)",
        pipe_table(&headers, &rows),
        result.rows.len()
    )
}

/// Render an ad-hoc query result as a JSON array of objects.
pub(crate) fn render_query_json(result: &QueryResult) -> Result<String> {
    let json_rows: Vec<serde_json::Value> = result
        .rows
        .iter()
        .map(|row| {
            let map: serde_json::Map<String, serde_json::Value> = result
                .columns
                .iter()
                .zip(row.iter())
                .map(|(col, val)| {
                    let json_val = match val {
                        Some(v) => serde_json::Value::String(v.clone()),
                        None => serde_json::Value::Null,
                    };
                    (col.clone(), json_val)
                })
                .collect();
            serde_json::Value::Object(map)
        })
        .collect();

    serde_json::to_string_pretty(&json_rows).context("Failed to serialize JSON output")
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
