//! Command-line interface for the Waymark reward engine.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod fs;
mod input;
mod nearby;
mod rewards;

pub use error::CliError;

use nearby::{NearbyArgs, run_nearby_with};
use rewards::{RewardsArgs, run_rewards_with};

pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_USERS: &str = "users";
pub(crate) const ARG_PROXIMITY_BUFFER: &str = "proximity-buffer";
pub(crate) const ARG_WORKERS: &str = "workers";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ENV_REWARDS_CATALOG: &str = "WAYMARK_CMDS_REWARDS_CATALOG";
pub(crate) const ENV_REWARDS_USERS: &str = "WAYMARK_CMDS_REWARDS_USERS";
pub(crate) const ENV_NEARBY_CATALOG: &str = "WAYMARK_CMDS_NEARBY_CATALOG";
pub(crate) const ENV_NEARBY_LATITUDE: &str = "WAYMARK_CMDS_NEARBY_LATITUDE";
pub(crate) const ENV_NEARBY_LONGITUDE: &str = "WAYMARK_CMDS_NEARBY_LONGITUDE";

/// Run the Waymark CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, inputs
/// cannot be read, the engine cannot start, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli, &mut stdout)
}

fn dispatch(cli: Cli, writer: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Rewards(args) => run_rewards_with(args, writer),
        Command::Nearby(args) => run_nearby_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Reward attribution for visits near attractions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Attribute reward points for recorded visits.
    Rewards(RewardsArgs),
    /// List the attractions closest to a location.
    Nearby(NearbyArgs),
}

pub(crate) fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
