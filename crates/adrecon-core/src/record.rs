//! Raw and normalized row representations for both report sides.
//!
//! A [`RawDataset`] is what a dataset provider hands over: column names plus
//! rows of optional text cells. The normalizer turns it into a [`Dataset`] of
//! typed [`Record`]s tagged with the platform they came from.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ad platform a row was exported from.
///
/// CM360 plays the *reference* role and GAM the *source* role: deltas are
/// always source minus reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    /// Google Ad Manager
    #[serde(rename = "GAM")]
    Gam,
    /// Campaign Manager 360
    #[serde(rename = "CM360")]
    Cm360,
}

impl SourceTag {
    /// Short label used in messages and reports.
    pub fn label(self) -> &'static str {
        match self {
            SourceTag::Gam => "GAM",
            SourceTag::Cm360 => "CM360",
        }
    }

    /// Prefix used for DuckDB table names.
    pub fn table_prefix(self) -> &'static str {
        match self {
            SourceTag::Gam => "gam",
            SourceTag::Cm360 => "cm360",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A relation of untyped text cells, as read from a CSV file or a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataset {
    /// Dataset name used in error messages (file name or table name)
    pub name: String,

    /// Column names in relation order
    pub columns: Vec<String>,

    /// Rows of cells; `None` is a missing / NULL cell
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawDataset {
    /// Create an empty dataset with the given columns.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from string slices, treating every cell as present.
    pub fn from_text(name: impl Into<String>, columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
                .collect(),
        }
    }

    /// Append a row of cells.
    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One normalized row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Platform the row came from
    pub tag: SourceTag,

    /// 1-based row number within its dataset
    pub row: usize,

    /// External identifier (creative id / placement id); `None` when absent
    pub identifier: Option<String>,

    /// Display name (creative name / placement name); `None` when absent
    pub display_name: Option<String>,

    /// Impressions, always non-negative
    pub impressions: i64,

    /// Clicks, always non-negative
    pub clicks: i64,
}

impl Record {
    /// Build a record from text values. Empty text becomes absent, the same
    /// rule the normalizer applies.
    pub fn new(
        tag: SourceTag,
        row: usize,
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        impressions: i64,
        clicks: i64,
    ) -> Self {
        Self {
            tag,
            row,
            identifier: non_empty(identifier.into()),
            display_name: non_empty(display_name.into()),
            impressions,
            clicks,
        }
    }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A normalized relation for one side of the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    /// Dataset name (carried over from the raw dataset)
    pub name: String,

    /// Which platform the dataset belongs to
    pub tag: SourceTag,

    /// Records in source order
    pub records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from already-normalized records.
    pub fn new(name: impl Into<String>, tag: SourceTag, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            tag,
            records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of impressions over all records.
    pub fn total_impressions(&self) -> CoreResult<i64> {
        self.total("impressions", |r| r.impressions)
    }

    /// Sum of clicks over all records.
    pub fn total_clicks(&self) -> CoreResult<i64> {
        self.total("clicks", |r| r.clicks)
    }

    fn total(&self, column: &str, value: impl Fn(&Record) -> i64) -> CoreResult<i64> {
        self.records
            .iter()
            .try_fold(0i64, |acc, r| acc.checked_add(value(r)))
            .ok_or_else(|| CoreError::overflow(format!("total {} of '{}'", column, self.name)))
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
