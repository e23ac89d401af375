//! Normalizer: raw text rows to typed records.
//!
//! Numeric columns have every `,` stripped before the integer cast; text
//! columns are carried through untouched apart from optional trimming.
//! Quote-aware field splitting has already happened upstream, so a comma
//! inside a text cell is just a character.

use crate::error::{CoreError, CoreResult};
use crate::record::{non_empty, Dataset, RawDataset, Record, SourceTag};
use crate::schema::SideSchema;
use serde::{Deserialize, Serialize};

/// Options controlling text handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizeOptions {
    /// Trim surrounding whitespace from text cells
    #[serde(default = "default_trim_text")]
    pub trim_text: bool,
}

fn default_trim_text() -> bool {
    true
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            trim_text: default_trim_text(),
        }
    }
}

/// Parse a count such as `"1,234"` into an integer.
///
/// Surrounding whitespace is ignored and every `,` is removed; what remains
/// must be a non-empty run of ASCII digits that fits in an `i64`.
pub fn parse_count(value: &str) -> Option<i64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

fn clean_text(cell: Option<&String>, options: &NormalizeOptions) -> Option<String> {
    let value = cell?;
    let value = if options.trim_text {
        value.trim()
    } else {
        value.as_str()
    };
    non_empty(value.to_string())
}

/// Normalize one raw dataset into records.
///
/// Fails with a schema error before reading any row when a role column is
/// missing, and with a parse error on the first numeric cell that does not
/// cast. No partial dataset is ever returned.
pub fn normalize(
    raw: &RawDataset,
    schema: &SideSchema,
    tag: SourceTag,
    options: &NormalizeOptions,
) -> CoreResult<Dataset> {
    let idx = schema.resolve(raw)?;

    let parse = |cells: &[Option<String>], col: usize, column: &str, row: usize| {
        let cell = cells.get(col).and_then(|c| c.as_ref());
        cell.and_then(|v| parse_count(v))
            .ok_or_else(|| CoreError::Parse {
                dataset: raw.name.clone(),
                column: column.to_string(),
                row,
                value: cell.cloned().unwrap_or_default(),
            })
    };

    let mut records = Vec::with_capacity(raw.len());
    for (i, cells) in raw.rows.iter().enumerate() {
        let row = i + 1;
        let impressions = parse(
            cells.as_slice(),
            idx.impressions,
            schema.impressions_column.as_str(),
            row,
        )?;
        let clicks = parse(
            cells.as_slice(),
            idx.clicks,
            schema.clicks_column.as_str(),
            row,
        )?;
        records.push(Record {
            tag,
            row,
            identifier: clean_text(
                cells.get(idx.identifier).and_then(|c| c.as_ref()),
                options,
            ),
            display_name: clean_text(
                cells.get(idx.display_name).and_then(|c| c.as_ref()),
                options,
            ),
            impressions,
            clicks,
        });
    }

    log::debug!(
        "Normalized {} rows from {} dataset '{}'",
        records.len(),
        tag,
        raw.name
    );
    if records.is_empty() {
        log::warn!("{} dataset '{}' has no rows", tag, raw.name);
    }

    Ok(Dataset::new(raw.name.clone(), tag, records))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
