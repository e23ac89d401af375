//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::row_helpers::get_column_as_string;
use crate::traits::{Database, QueryResult};
use adrecon_core::sql_utils::{escape_sql_string, quote_ident, split_qualified_name};
use adrecon_core::{Dataset, RawDataset};
use async_trait::async_trait;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = '{}' AND table_name = '{}'",
            escape_sql_string(schema),
            escape_sql_string(table)
        );
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn require_relation(&self, name: &str) -> DbResult<()> {
        if self.relation_exists_sync(name)? {
            Ok(())
        } else {
            Err(DbError::TableNotFound(name.to_string()))
        }
    }

    /// Column names of a relation in ordinal order
    fn column_names_sync(&self, name: &str) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);
        let sql = format!(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_schema = '{}' AND table_name = '{}' \
             ORDER BY ordinal_position",
            escape_sql_string(schema),
            escape_sql_string(table)
        );
        let mut stmt = conn.prepare(&sql)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn row_count_sync(&self, table: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|_| DbError::InvalidValue(format!("row count {count}")))
    }

    fn load_csv_sync(&self, table: &str, path: &str) -> DbResult<()> {
        if !Path::new(path).is_file() {
            return Err(DbError::CsvError(format!("file not found: {path}")));
        }
        let sql = format!(
            "CREATE OR REPLACE TABLE {} AS SELECT * FROM read_csv('{}', header = true, all_varchar = true)",
            quote_ident(table),
            escape_sql_string(path)
        );
        let conn = self.lock()?;
        conn.execute(&sql, [])
            .map_err(|e| DbError::CsvError(format!("{path}: {e}")))?;
        Ok(())
    }

    fn fetch_raw_sync(&self, table: &str) -> DbResult<RawDataset> {
        self.require_relation(table)?;
        let columns = self.column_names_sync(table)?;
        if columns.is_empty() {
            return Ok(RawDataset::new(table, columns));
        }

        let select_list = columns
            .iter()
            .map(|c| format!("CAST({} AS VARCHAR)", quote_ident(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            select_list,
            quote_ident(table)
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Option<String>>(i))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut raw = RawDataset::new(table, columns);
        raw.rows = rows;
        log::debug!("Fetched {} rows from {}", raw.len(), table);
        Ok(raw)
    }

    fn store_dataset_sync(&self, table: &str, dataset: &Dataset) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} (\
             row_no BIGINT NOT NULL, \
             identifier VARCHAR, \
             display_name VARCHAR, \
             impressions BIGINT NOT NULL, \
             clicks BIGINT NOT NULL)",
            quote_ident(table)
        ))?;

        let mut appender = conn.appender(table)?;
        for record in &dataset.records {
            let row_no = i64::try_from(record.row)
                .map_err(|_| DbError::InvalidValue(format!("row number {}", record.row)))?;
            appender.append_row(params![
                row_no,
                record.identifier.as_deref(),
                record.display_name.as_deref(),
                record.impressions,
                record.clicks,
            ])?;
        }
        appender.flush()?;

        log::debug!("Stored {} rows in {}", dataset.len(), table);
        Ok(())
    }

    fn query_sync(&self, sql: &str) -> DbResult<QueryResult> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;

        // Column metadata is only available once the statement has run.
        let rows = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count)
                    .map(|i| get_column_as_string(row, i))
                    .collect::<Vec<_>>())
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let columns = (0..stmt.column_count())
            .map(|i| stmt.column_name(i).map_or("?".to_string(), |v| v.to_string()))
            .collect();

        Ok(QueryResult { columns, rows })
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn row_count(&self, table: &str) -> DbResult<usize> {
        self.require_relation(table)?;
        self.row_count_sync(table)
    }

    async fn load_csv_text(&self, table: &str, path: &str) -> DbResult<()> {
        self.load_csv_sync(table, path)?;
        log::debug!("Loaded {} into {}", path, table);
        Ok(())
    }

    async fn fetch_raw(&self, table: &str) -> DbResult<RawDataset> {
        self.fetch_raw_sync(table)
    }

    async fn store_dataset(&self, table: &str, dataset: &Dataset) -> DbResult<()> {
        self.store_dataset_sync(table, dataset)
    }

    async fn drop_if_exists(&self, name: &str) -> DbResult<()> {
        // The relation may be either kind; only the mismatched DROP may fail.
        let quoted = quote_ident(name);
        for kind in ["VIEW", "TABLE"] {
            match self.execute_sync(&format!("DROP {} IF EXISTS {}", kind, quoted)) {
                Ok(_) | Err(DbError::ExecutionError(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn query(&self, sql: &str) -> DbResult<QueryResult> {
        self.query_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
