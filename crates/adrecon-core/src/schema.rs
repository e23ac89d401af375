//! Schema declaration: which column plays which role on each side.

use crate::error::{CoreError, CoreResult};
use crate::record::{RawDataset, SourceTag};
use serde::{Deserialize, Serialize};

/// Column roles for one side of the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideSchema {
    /// Column holding the external identifier
    pub identifier_column: String,

    /// Column holding the human-readable name
    pub display_name_column: String,

    /// Column holding impressions (may contain thousands separators)
    #[serde(default = "default_impressions_column")]
    pub impressions_column: String,

    /// Column holding clicks (may contain thousands separators)
    #[serde(default = "default_clicks_column")]
    pub clicks_column: String,
}

fn default_impressions_column() -> String {
    "impressions".to_string()
}

fn default_clicks_column() -> String {
    "clicks".to_string()
}

/// Resolved positions of the four role columns within a raw dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub identifier: usize,
    pub display_name: usize,
    pub impressions: usize,
    pub clicks: usize,
}

impl SideSchema {
    /// Default GAM export layout.
    pub fn gam() -> Self {
        Self {
            identifier_column: "creative_id".to_string(),
            display_name_column: "creative_name".to_string(),
            impressions_column: default_impressions_column(),
            clicks_column: default_clicks_column(),
        }
    }

    /// Default CM360 export layout.
    pub fn cm360() -> Self {
        Self {
            identifier_column: "placement_id".to_string(),
            display_name_column: "placement_name".to_string(),
            impressions_column: default_impressions_column(),
            clicks_column: default_clicks_column(),
        }
    }

    /// Default layout for a side.
    pub fn default_for(tag: SourceTag) -> Self {
        match tag {
            SourceTag::Gam => Self::gam(),
            SourceTag::Cm360 => Self::cm360(),
        }
    }

    /// The four role columns in identifier, name, impressions, clicks order.
    pub fn columns(&self) -> [&str; 4] {
        [
            &self.identifier_column,
            &self.display_name_column,
            &self.impressions_column,
            &self.clicks_column,
        ]
    }

    /// Check the declaration itself: names non-empty and pairwise distinct.
    pub fn validate(&self, tag: SourceTag) -> CoreResult<()> {
        let columns = self.columns();
        if let Some(empty) = columns.iter().position(|c| c.trim().is_empty()) {
            let role = ["identifier", "display name", "impressions", "clicks"][empty];
            return Err(CoreError::ConfigInvalid {
                message: format!("{tag} {role} column name cannot be empty"),
            });
        }
        for (i, a) in columns.iter().enumerate() {
            if columns[i + 1..].contains(a) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{tag} column '{a}' is mapped to more than one role"),
                });
            }
        }
        Ok(())
    }

    /// Locate every role column in `raw`, failing with a schema error naming
    /// the first missing one.
    pub fn resolve(&self, raw: &RawDataset) -> CoreResult<ColumnIndices> {
        let find = |column: &str| {
            raw.column_index(column).ok_or_else(|| CoreError::Schema {
                dataset: raw.name.clone(),
                column: column.to_string(),
            })
        };
        Ok(ColumnIndices {
            identifier: find(&self.identifier_column)?,
            display_name: find(&self.display_name_column)?,
            impressions: find(&self.impressions_column)?,
            clicks: find(&self.clicks_column)?,
        })
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
