//! CLI argument definitions using clap derive API

use adrecon_core::{Engine, MatchType};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueEnum};

/// adrecon - Reconcile GAM delivery metrics against CM360
#[derive(Parser, Debug)]
#[command(name = "adrecon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (a .duckdb file or :memory:)
    #[arg(short, long, global = true, env = "ADRECON_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load GAM and CM360 CSV exports into the database
    Load(LoadArgs),

    /// Compare GAM against CM360 and report discrepancies
    Compare(CompareArgs),

    /// Run SQL against the database
    Query(QueryArgs),
}

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// GAM (source) CSV export
    #[arg(long)]
    pub gam: String,

    /// CM360 (reference) CSV export
    #[arg(long)]
    pub cm360: String,

    /// Name for this load's tables (default: a fresh UUID)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

/// Arguments for the compare command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["gam", "namespace"])))]
pub struct CompareArgs {
    /// GAM (source) CSV export
    #[arg(long, requires = "cm360")]
    pub gam: Option<String>,

    /// CM360 (reference) CSV export
    #[arg(long, requires = "gam")]
    pub cm360: Option<String>,

    /// Compare tables stored by an earlier `adrecon load`
    #[arg(short, long, conflicts_with_all = ["gam", "cm360"])]
    pub namespace: Option<String>,

    /// Strategy evaluation engine (overrides matching.engine)
    #[arg(short, long, value_enum)]
    pub engine: Option<EngineArg>,

    /// Strategies to evaluate, comma-separated (overrides matching.strategies)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub strategies: Option<Vec<StrategyArg>>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Include CM360 rows that no strategy matched
    #[arg(long)]
    pub unmatched: bool,

    /// Omit the overall totals section
    #[arg(long)]
    pub no_totals: bool,

    /// Exit with status 1 when any discrepancy is found
    #[arg(long)]
    pub fail_on_discrepancy: bool,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL to execute
    pub sql: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable sections and tables
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Engine choices
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineArg {
    /// Evaluate in process
    Memory,
    /// Evaluate as DuckDB grouped joins
    Duckdb,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Memory => Engine::Memory,
            EngineArg::Duckdb => Engine::DuckDb,
        }
    }
}

/// Strategy choices, spelled as in adrecon.yml
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum StrategyArg {
    /// CM360 identifier equals GAM identifier
    IdMatch,
    /// CM360 identifier appears in the GAM name
    IdInNameMatch,
    /// GAM name starts with the CM360 name
    PrefixNameMatch,
}

impl From<StrategyArg> for MatchType {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::IdMatch => MatchType::IdMatch,
            StrategyArg::IdInNameMatch => MatchType::IdInNameMatch,
            StrategyArg::PrefixNameMatch => MatchType::PrefixNameMatch,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
