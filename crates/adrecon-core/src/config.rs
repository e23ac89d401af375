//! Configuration types and parsing for adrecon.yml

use crate::error::{CoreError, CoreResult};
use crate::matcher::MatchType;
use crate::normalize::NormalizeOptions;
use crate::record::SourceTag;
use crate::report::ReportOptions;
use crate::schema::SideSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File names probed by [`Config::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["adrecon.yml", "adrecon.yaml"];

/// Main configuration from adrecon.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Column roles of the GAM (source) export
    #[serde(default = "SideSchema::gam")]
    pub gam: SideSchema,

    /// Column roles of the CM360 (reference) export
    #[serde(default = "SideSchema::cm360")]
    pub cm360: SideSchema,

    /// Text normalization options
    #[serde(default)]
    pub normalize: NormalizeOptions,

    /// Strategy selection and evaluation
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Report sections
    #[serde(default)]
    pub report: ReportOptions,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (a .duckdb file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

/// Which implementation evaluates the match strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Pure Rust evaluation over normalized records (default)
    #[default]
    Memory,
    /// Grouped joins executed by DuckDB
    DuckDb,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Memory => write!(f, "memory"),
            Engine::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Strategy selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Enabled strategies; always evaluated in their fixed order
    #[serde(default = "default_strategies")]
    pub strategies: Vec<MatchType>,

    /// Evaluate strategies on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Evaluation engine
    #[serde(default)]
    pub engine: Engine,
}

fn default_strategies() -> Vec<MatchType> {
    MatchType::ALL.to_vec()
}

fn default_parallel() -> bool {
    true
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            parallel: default_parallel(),
            engine: Engine::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            gam: SideSchema::gam(),
            cm360: SideSchema::cm360(),
            normalize: NormalizeOptions::default(),
            matching: MatchingConfig::default(),
            report: ReportOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        // An empty file deserializes to unit, not a mapping.
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load adrecon.yml / adrecon.yaml from a directory, falling back to the
    /// defaults when neither exists
    pub fn discover(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("Loading config from {}", path.display());
                return Self::load(&path);
            }
        }
        log::debug!("No config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        self.gam.validate(SourceTag::Gam)?;
        self.cm360.validate(SourceTag::Cm360)?;
        if self.matching.strategies.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "matching.strategies must enable at least one strategy".to_string(),
            });
        }
        Ok(())
    }

    /// Schema declaration for one side
    pub fn schema_for(&self, tag: SourceTag) -> &SideSchema {
        match tag {
            SourceTag::Gam => &self.gam,
            SourceTag::Cm360 => &self.cm360,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
