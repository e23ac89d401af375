//! adrecon CLI - reconcile GAM delivery metrics against CM360

use adrecon_core::CoreError;
use adrecon_db::DbError;
use clap::Parser;
use env_logger::Env;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{common, compare, load, query};

/// Exit status for schema, parse and overflow errors in the input data
const EXIT_DATA_ERROR: u8 = 3;
/// Exit status for every other failure
const EXIT_FAILURE: u8 = 2;

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Load(args) => load::execute(args, &cli.global).await,
        cli::Commands::Compare(args) => compare::execute(args, &cli.global).await,
        cli::Commands::Query(args) => query::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            if let Some(code) = err.downcast_ref::<common::ExitCode>() {
                return std::process::ExitCode::from(code.0);
            }
            eprintln!("Error: {err:#}");
            let data_error = err
                .downcast_ref::<CoreError>()
                .or_else(|| err.downcast_ref::<DbError>().and_then(DbError::as_core))
                .is_some_and(CoreError::is_data_error);
            std::process::ExitCode::from(if data_error {
                EXIT_DATA_ERROR
            } else {
                EXIT_FAILURE
            })
        }
    }
}
