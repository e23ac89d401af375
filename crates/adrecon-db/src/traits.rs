//! Database trait definition

use crate::error::DbResult;
use adrecon_core::{Dataset, RawDataset};
use async_trait::async_trait;

/// Result of an ad-hoc query, every value rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Column names from the result set
    pub columns: Vec<String>,
    /// Rows of text values; `None` is SQL NULL
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    /// Whether the query returned no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Database abstraction trait for adrecon
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Number of rows in a table
    async fn row_count(&self, table: &str) -> DbResult<usize>;

    /// Load a headered CSV file into a table with every column as text
    async fn load_csv_text(&self, table: &str, path: &str) -> DbResult<()>;

    /// Read a table as untyped text cells, in row order
    async fn fetch_raw(&self, table: &str) -> DbResult<RawDataset>;

    /// Write a normalized dataset to a table, replacing it if present
    async fn store_dataset(&self, table: &str, dataset: &Dataset) -> DbResult<()>;

    /// Drop a table or view if it exists
    async fn drop_if_exists(&self, name: &str) -> DbResult<()>;

    /// Run a query and return its columns and text rows
    async fn query(&self, sql: &str) -> DbResult<QueryResult>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
