//! Table naming for one run's datasets.

use crate::error::{CoreError, CoreResult};
use crate::record::SourceTag;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static NON_WORD_RE: OnceLock<Regex> = OnceLock::new();

fn non_word_re() -> &'static Regex {
    NON_WORD_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid regex"))
}

/// Suffix shared by the raw and clean tables of one load.
///
/// Two loads with different namespaces never touch each other's tables, so
/// concurrent runs against the same database file are independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Sanitize a caller-supplied namespace.
    ///
    /// Runs of characters outside `[A-Za-z0-9_]` become a single `_`, the
    /// result is lowercased, and leading/trailing underscores are dropped.
    pub fn new(raw: &str) -> CoreResult<Self> {
        let replaced = non_word_re().replace_all(raw.trim(), "_");
        let cleaned = replaced.trim_matches('_').to_lowercase();
        if cleaned.is_empty() {
            return Err(CoreError::InvalidNamespace {
                namespace: raw.to_string(),
                reason: "must contain at least one letter or digit".to_string(),
            });
        }
        Ok(Self(cleaned))
    }

    /// A fresh namespace (UUID v4, simple form).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Sanitized namespace text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Table holding the CSV as loaded (all text columns).
    pub fn raw_table(&self, tag: SourceTag) -> String {
        format!("{}_{}", tag.table_prefix(), self.0)
    }

    /// Table holding the normalized dataset.
    pub fn clean_table(&self, tag: SourceTag) -> String {
        format!("{}_{}_clean", tag.table_prefix(), self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "namespace_test.rs"]
mod tests;
