//! Nearby-attraction command implementation for the Waymark CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{AttractionId, Coordinate, UserId};
use waymark_rewards::EngineConfig;

use crate::input::write_json;
use crate::rewards::build_engine;
use crate::{
    ARG_CATALOG, ARG_LATITUDE, ARG_LONGITUDE, ARG_SEED, CliError, ENV_NEARBY_CATALOG,
    ENV_NEARBY_LATITUDE, ENV_NEARBY_LONGITUDE, build_runtime, require_existing,
};

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "nearby",
    long_about = "List the five catalog attractions closest to a location, \
                 with their distance in statute miles and the points the \
                 given user would earn there.",
    about = "List the attractions closest to a location"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct NearbyArgs {
    /// Path to a JSON array of attractions.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Latitude of the queried location in degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the queried location in degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// User whose reward points are reported.
    #[arg(long = "user", value_name = "uuid")]
    #[serde(default)]
    pub(crate) user: Option<UserId>,
    /// Seed for the deterministic points oracle.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl NearbyArgs {
    pub(crate) fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    /// Path to the attraction catalog.
    pub(crate) catalog: Utf8PathBuf,
    /// Queried location.
    pub(crate) location: Coordinate,
    /// User whose points are reported.
    pub(crate) user: UserId,
    /// Oracle seed.
    pub(crate) seed: u64,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_NEARBY_CATALOG,
        })?;
        let latitude = args.latitude.ok_or(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_NEARBY_LATITUDE,
        })?;
        let longitude = args.longitude.ok_or(CliError::MissingArgument {
            field: ARG_LONGITUDE,
            env: ENV_NEARBY_LONGITUDE,
        })?;
        Ok(Self {
            catalog,
            location: Coordinate::try_new(latitude, longitude)?,
            user: args
                .user
                .unwrap_or_else(|| UserId::from_uuid(uuid::Uuid::nil())),
            seed: args.seed.unwrap_or_default(),
        })
    }
}

/// One row of `nearby` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct NearbyEntry {
    pub(crate) attraction_id: AttractionId,
    pub(crate) name: String,
    pub(crate) location: Coordinate,
    pub(crate) distance_miles: f64,
    pub(crate) reward_points: Option<u32>,
}

/// Full `nearby` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct NearbyListing {
    pub(crate) user_id: UserId,
    pub(crate) location: Coordinate,
    pub(crate) attractions: Vec<NearbyEntry>,
}

pub(super) fn run_nearby_with(args: NearbyArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.catalog, ARG_CATALOG)?;
    let listing = execute_nearby(&config)?;
    write_json(writer, &listing)
}

pub(crate) fn execute_nearby(config: &NearbyConfig) -> Result<NearbyListing, CliError> {
    let engine = build_engine(&config.catalog, config.seed, EngineConfig::default())?;
    let runtime = build_runtime()?;
    let nearby = runtime.block_on(engine.nearby_attractions(config.user, config.location));
    Ok(NearbyListing {
        user_id: config.user,
        location: config.location,
        attractions: nearby
            .into_iter()
            .map(|entry| NearbyEntry {
                attraction_id: entry.attraction.id,
                name: entry.attraction.name,
                location: entry.attraction.location,
                distance_miles: entry.distance_miles,
                reward_points: entry.reward_points,
            })
            .collect(),
    })
}
