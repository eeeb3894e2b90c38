//! Rewards command implementation for the Waymark CLI.

use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{RewardRecord, User, UserId};
use waymark_rewards::{EngineConfig, RewardAttributionEngine, SeededPointOracle};

use crate::input::{JsonFileCatalog, load_users, write_json};
use crate::{
    ARG_CATALOG, ARG_PROXIMITY_BUFFER, ARG_SEED, ARG_USERS, ARG_WORKERS, CliError,
    ENV_REWARDS_CATALOG, ENV_REWARDS_USERS, build_runtime, require_existing,
};

/// CLI arguments for the `rewards` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rewards",
    long_about = "Attribute reward points to every user in a JSON users file \
                 for visits that came within the proximity buffer of an \
                 attraction in the JSON catalog. Points come from a seeded \
                 deterministic oracle.",
    about = "Attribute rewards for recorded visits"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct RewardsArgs {
    /// Path to a JSON array of attractions.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Path to a JSON array of users with their visits.
    #[arg(long = ARG_USERS, value_name = "path")]
    #[serde(default)]
    pub(crate) users: Option<Utf8PathBuf>,
    /// Reward-eligibility radius in statute miles.
    #[arg(long = ARG_PROXIMITY_BUFFER, value_name = "miles")]
    #[serde(default)]
    pub(crate) proximity_buffer: Option<f64>,
    /// Number of pair evaluations allowed to run at once.
    #[arg(long = ARG_WORKERS, value_name = "count")]
    #[serde(default)]
    pub(crate) workers: Option<usize>,
    /// Seed for the deterministic points oracle.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl RewardsArgs {
    pub(crate) fn into_config(self) -> Result<RewardsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RewardsConfig::try_from(merged)
    }
}

/// Resolved `rewards` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RewardsConfig {
    /// Path to the attraction catalog.
    pub(crate) catalog: Utf8PathBuf,
    /// Path to the users file.
    pub(crate) users: Utf8PathBuf,
    /// Engine thresholds and pool size.
    pub(crate) engine: EngineConfig,
    /// Oracle seed.
    pub(crate) seed: u64,
}

impl RewardsConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.catalog, ARG_CATALOG)?;
        require_existing(&self.users, ARG_USERS)?;
        Ok(())
    }
}

impl TryFrom<RewardsArgs> for RewardsConfig {
    type Error = CliError;

    fn try_from(args: RewardsArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_REWARDS_CATALOG,
        })?;
        let users = args.users.ok_or(CliError::MissingArgument {
            field: ARG_USERS,
            env: ENV_REWARDS_USERS,
        })?;

        let mut engine = EngineConfig::default();
        if let Some(miles) = args.proximity_buffer {
            engine = engine.with_proximity_buffer_miles(miles);
        }
        if let Some(workers) = args.workers {
            engine = engine.with_worker_capacity(workers);
        }

        Ok(Self {
            catalog,
            users,
            engine,
            seed: args.seed.unwrap_or_default(),
        })
    }
}

/// A user's rewards after attribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct UserRewards {
    pub(crate) user_id: UserId,
    pub(crate) name: String,
    pub(crate) total_points: u64,
    pub(crate) rewards: Vec<RewardRecord>,
    pub(crate) failed_pairs: usize,
}

pub(super) fn run_rewards_with(args: RewardsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_rewards_config(args)?;
    let summaries = execute_rewards(&config)?;
    write_json(writer, &summaries)
}

fn resolve_rewards_config(args: RewardsArgs) -> Result<RewardsConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_rewards(config: &RewardsConfig) -> Result<Vec<UserRewards>, CliError> {
    let users: Vec<User> = load_users(&config.users)?
        .into_iter()
        .map(User::from)
        .collect();
    let engine = build_engine(&config.catalog, config.seed, config.engine.clone())?;
    let runtime = build_runtime()?;
    runtime.block_on(attribute_all(&engine, users))
}

pub(crate) fn build_engine(
    catalog_path: &Utf8Path,
    seed: u64,
    config: EngineConfig,
) -> Result<RewardAttributionEngine, CliError> {
    let catalog = JsonFileCatalog::new(catalog_path.to_path_buf());
    let engine =
        RewardAttributionEngine::new(&catalog, Arc::new(SeededPointOracle::new(seed)), config)?;
    Ok(engine)
}

async fn attribute_all(
    engine: &RewardAttributionEngine,
    users: Vec<User>,
) -> Result<Vec<UserRewards>, CliError> {
    // Start every user before awaiting any, so they share the pool.
    let handles: Vec<_> = users
        .iter()
        .map(|user| engine.attribute_rewards(user))
        .collect();

    let mut summaries = Vec::with_capacity(users.len());
    for (user, handle) in users.into_iter().zip(handles) {
        let report = handle.await?;
        log::info!(
            "{}: {} rewards added, {} pairs failed",
            user.name(),
            report.rewards_added,
            report.failures.len()
        );
        summaries.push(UserRewards {
            user_id: user.id(),
            name: user.name().to_owned(),
            total_points: user.rewards().total_points(),
            rewards: user.rewards().records(),
            failed_pairs: report.failures.len(),
        });
    }
    Ok(summaries)
}
