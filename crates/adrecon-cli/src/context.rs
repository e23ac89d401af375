//! Runtime context for CLI commands

use adrecon_core::Config;
use adrecon_db::{Database, DuckDbBackend};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Loaded configuration and an open database connection
pub struct RuntimeContext {
    /// Effective configuration (file values plus CLI overrides)
    pub config: Config,

    /// Database connection
    pub db: Arc<dyn Database>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            Config::discover(&cwd).context("Failed to load configuration")?
        };

        if let Some(path) = &args.database {
            config.database.path = path.clone();
        }

        let db: Arc<dyn Database> = Arc::new(
            DuckDbBackend::new(&config.database.path).context("Failed to connect to database")?,
        );
        log::debug!("Opened {} database at {}", db.db_type(), config.database.path);

        Ok(Self { config, db })
    }

    /// Whether tables written now disappear when the process exits
    pub fn is_ephemeral(&self) -> bool {
        self.config.database.path == ":memory:"
    }
}
