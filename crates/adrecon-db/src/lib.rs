//! adrecon-db - Database layer for adrecon
//!
//! This crate provides the `Database` trait, its DuckDB implementation, and
//! the SQL engine that evaluates match strategies as grouped joins.

pub mod duckdb;
pub mod error;
mod row_helpers;
pub mod sql_matcher;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use sql_matcher::SqlMatcher;
pub use traits::{Database, QueryResult};
