//! Command-line interface for comparing POI datasets.
#![forbid(unsafe_code)]

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod compare;
mod error;

pub use error::CliError;

use compare::{CompareArgs, run_compare};

pub(crate) const ARG_FILE_A: &str = "file-a";
pub(crate) const ARG_FILE_B: &str = "file-b";
pub(crate) const ARG_DELIMITER: &str = "delimiter";
pub(crate) const ENV_FILE_A: &str = "POISIM_CMDS_COMPARE_FILE_A";
pub(crate) const ENV_FILE_B: &str = "POISIM_CMDS_COMPARE_FILE_B";

/// Run the poisim CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, loading,
/// comparison or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Compare(args) => run_compare(args),
    }
}

fn init_logging(verbose: u8) -> Result<(), CliError> {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(CliError::Logging)
}

#[derive(Debug, Parser)]
#[command(
    name = "poisim",
    about = "Score how closely two point-of-interest datasets agree",
    version
)]
struct Cli {
    /// Increase log verbosity (repeat for more detail). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two CSV datasets and report their similarity.
    Compare(CompareArgs),
}

#[cfg(test)]
mod tests;
