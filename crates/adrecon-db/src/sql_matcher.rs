//! Match strategies evaluated as grouped joins inside DuckDB.
//!
//! Produces the same [`MatchOutcome`] as the in-memory engine, so the shared
//! detector and report builder work unchanged on either.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, QueryResult};
use adrecon_core::sql_utils::quote_ident;
use adrecon_core::{
    CoreError, Dataset, MatchGroup, MatchOutcome, MatchType, Namespace, SourceTag,
};
use std::time::Instant;

/// Runs the enabled strategies against two normalized tables.
pub struct SqlMatcher<'a> {
    db: &'a dyn Database,
    strategies: Vec<MatchType>,
}

/// Join predicate and label columns of one strategy over aliases `r`
/// (reference) and `s` (source).
fn strategy_sql(match_type: MatchType) -> (&'static str, &'static str, &'static str) {
    match match_type {
        MatchType::IdMatch => ("r.identifier = s.identifier", "r.identifier", "s.identifier"),
        MatchType::IdInNameMatch => (
            "strpos(s.display_name, r.identifier) > 0",
            "r.identifier",
            "s.display_name",
        ),
        MatchType::PrefixNameMatch => (
            "starts_with(s.display_name, r.display_name)",
            "r.display_name",
            "s.display_name",
        ),
    }
}

fn join_clause(match_type: MatchType, reference_table: &str, source_table: &str) -> String {
    let (predicate, group_label, source_label) = strategy_sql(match_type);
    format!(
        "FROM {} r JOIN {} s ON {} WHERE {} IS NOT NULL AND {} IS NOT NULL",
        quote_ident(reference_table),
        quote_ident(source_table),
        predicate,
        group_label,
        source_label
    )
}

/// Grouped aggregate of one strategy, ordered by first reference row.
pub fn groups_sql(match_type: MatchType, reference_table: &str, source_table: &str) -> String {
    let (_, group_label, source_label) = strategy_sql(match_type);
    format!(
        "SELECT {group_label} AS reference_key, \
         r.impressions AS reference_impressions, \
         r.clicks AS reference_clicks, \
         MIN({source_label}) AS source_representative, \
         CAST(SUM(s.impressions) AS VARCHAR) AS source_impressions, \
         CAST(SUM(s.clicks) AS VARCHAR) AS source_clicks, \
         COUNT(*) AS matched_pairs, \
         MIN(r.row_no) AS first_reference_row \
         {join} \
         GROUP BY {group_label}, r.impressions, r.clicks \
         ORDER BY first_reference_row",
        join = join_clause(match_type, reference_table, source_table),
    )
}

/// Reference rows joined by one strategy.
pub fn matched_rows_sql(
    match_type: MatchType,
    reference_table: &str,
    source_table: &str,
) -> String {
    format!(
        "SELECT DISTINCT r.row_no {} ORDER BY r.row_no",
        join_clause(match_type, reference_table, source_table)
    )
}

fn text_cell(row: &[Option<String>], idx: usize, what: &str) -> DbResult<String> {
    row.get(idx)
        .cloned()
        .flatten()
        .ok_or_else(|| DbError::InvalidValue(format!("{what} is NULL")))
}

fn int_cell(row: &[Option<String>], idx: usize, what: &str) -> DbResult<i64> {
    let text = text_cell(row, idx, what)?;
    text.parse::<i64>()
        .map_err(|_| DbError::InvalidValue(format!("{what} = {text:?} is not an integer")))
}

/// A SUM column. DuckDB sums BIGINT into HUGEINT, so the text may hold a
/// value past `i64::MAX`.
fn sum_cell(row: &[Option<String>], idx: usize, what: &str, key: &str) -> DbResult<i64> {
    let text = text_cell(row, idx, what)?;
    if let Ok(n) = text.parse::<i64>() {
        return Ok(n);
    }
    if text.parse::<i128>().is_ok() {
        return Err(CoreError::overflow(format!("{what} of group '{key}'")).into());
    }
    Err(DbError::InvalidValue(format!("{what} = {text:?} is not an integer")))
}

fn count_cell(row: &[Option<String>], idx: usize, what: &str) -> DbResult<usize> {
    let n = int_cell(row, idx, what)?;
    usize::try_from(n).map_err(|_| DbError::InvalidValue(format!("{what} = {n} is negative")))
}

fn parse_groups(match_type: MatchType, result: &QueryResult) -> DbResult<Vec<MatchGroup>> {
    result
        .rows
        .iter()
        .map(|row| {
            let reference_key = text_cell(row, 0, "reference_key")?;
            let source_impressions = sum_cell(
                row,
                4,
                &format!("{match_type} source impressions"),
                &reference_key,
            )?;
            let source_clicks =
                sum_cell(row, 5, &format!("{match_type} source clicks"), &reference_key)?;
            Ok(MatchGroup {
                match_type,
                reference_key,
                reference_impressions: int_cell(row, 1, "reference_impressions")?,
                reference_clicks: int_cell(row, 2, "reference_clicks")?,
                source_representative: text_cell(row, 3, "source_representative")?,
                source_impressions,
                source_clicks,
                matched_pairs: count_cell(row, 6, "matched_pairs")?,
                first_reference_row: count_cell(row, 7, "first_reference_row")?,
            })
        })
        .collect()
}

impl<'a> SqlMatcher<'a> {
    /// Create a matcher for the given strategies. Order and duplicates in
    /// `strategies` do not matter.
    pub fn new(db: &'a dyn Database, strategies: &[MatchType]) -> Self {
        Self {
            db,
            strategies: MatchType::canonical(strategies),
        }
    }

    /// Strategies this matcher evaluates, in concatenation order.
    pub fn strategies(&self) -> &[MatchType] {
        &self.strategies
    }

    /// Store both datasets as the namespace's clean tables and match them.
    pub async fn run(
        &self,
        reference: &Dataset,
        source: &Dataset,
        namespace: &Namespace,
    ) -> DbResult<MatchOutcome> {
        let reference_table = namespace.clean_table(SourceTag::Cm360);
        let source_table = namespace.clean_table(SourceTag::Gam);
        self.db.store_dataset(&reference_table, reference).await?;
        self.db.store_dataset(&source_table, source).await?;
        self.run_tables(&reference_table, &source_table).await
    }

    /// Match two tables already holding normalized datasets.
    pub async fn run_tables(
        &self,
        reference_table: &str,
        source_table: &str,
    ) -> DbResult<MatchOutcome> {
        for table in [reference_table, source_table] {
            if !self.db.relation_exists(table).await? {
                return Err(DbError::TableNotFound(table.to_string()));
            }
        }

        let start = Instant::now();
        let mut outcome = MatchOutcome {
            strategies: self.strategies.clone(),
            ..Default::default()
        };

        for &match_type in &self.strategies {
            let result = self
                .db
                .query(&groups_sql(match_type, reference_table, source_table))
                .await?;
            let groups = parse_groups(match_type, &result)?;
            log::debug!("{}: {} groups", match_type, groups.len());
            outcome.groups.extend(groups);

            let matched = self
                .db
                .query(&matched_rows_sql(match_type, reference_table, source_table))
                .await?;
            for row in &matched.rows {
                outcome
                    .matched_reference_rows
                    .insert(count_cell(row, 0, "row_no")?);
            }
        }

        log::debug!(
            "{} matched {} and {} into {} groups in {}ms",
            self.db.db_type(),
            reference_table,
            source_table,
            outcome.groups.len(),
            start.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "sql_matcher_test.rs"]
mod tests;
