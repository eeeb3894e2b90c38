//! Focused unit tests covering rewards CLI configuration and input decoding.

use super::helpers::{FOUNTAIN_ID, STAY_AT_HOME_ID, VISITOR_ID, Workspace, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use crate::input::{JsonFileCatalog, load_users};
use crate::rewards::{RewardsConfig, execute_rewards};
use rstest::rstest;
use waymark_core::{AttractionCatalog, CatalogError, UserId};
use waymark_rewards::{EngineBuildError, EngineConfig, SEEDED_POINTS_RANGE};

fn config_for(workspace: &Workspace) -> RewardsConfig {
    RewardsConfig {
        catalog: workspace.write_catalog(),
        users: workspace.write_users(),
        engine: EngineConfig::default(),
        seed: 7,
    }
}

fn user_id(raw: &str) -> UserId {
    UserId::from(raw.parse::<uuid::Uuid>().expect("valid uuid"))
}

#[rstest]
#[case::missing_catalog(None, Some("users.json"), ARG_CATALOG, ENV_REWARDS_CATALOG)]
#[case::missing_users(Some("catalog.json"), None, ARG_USERS, ENV_REWARDS_USERS)]
fn converting_rewards_without_sources_errors(
    #[case] catalog: Option<&str>,
    #[case] users: Option<&str>,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let args = RewardsArgs {
        catalog: catalog.map(Utf8PathBuf::from),
        users: users.map(Utf8PathBuf::from),
        ..RewardsArgs::default()
    };

    let err = RewardsConfig::try_from(args).expect_err("missing source should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn rewards_config_applies_engine_overrides() {
    let args = RewardsArgs {
        catalog: Some(Utf8PathBuf::from("catalog.json")),
        users: Some(Utf8PathBuf::from("users.json")),
        proximity_buffer: Some(25.0),
        workers: Some(4),
        seed: Some(99),
    };

    let config = RewardsConfig::try_from(args).expect("config should build");
    assert_eq!(
        config.engine,
        EngineConfig::default()
            .with_proximity_buffer_miles(25.0)
            .with_worker_capacity(4)
    );
    assert_eq!(config.seed, 99);
}

#[rstest]
fn rewards_config_defaults_engine_and_seed() {
    let args = RewardsArgs {
        catalog: Some(Utf8PathBuf::from("catalog.json")),
        users: Some(Utf8PathBuf::from("users.json")),
        ..RewardsArgs::default()
    };

    let config = RewardsConfig::try_from(args).expect("config should build");
    assert_eq!(config.engine, EngineConfig::default());
    assert_eq!(config.seed, 0);
}

#[rstest]
#[case::missing_catalog(ARG_CATALOG)]
#[case::missing_users(ARG_USERS)]
fn validate_sources_reports_missing_files(#[case] expected_field: &'static str) {
    let workspace = Workspace::new();
    let mut config = config_for(&workspace);
    if expected_field == ARG_CATALOG {
        config.catalog = workspace.path("absent-catalog.json");
    } else {
        config.users = workspace.path("absent-users.json");
    }

    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file() {
    let workspace = Workspace::new();
    let mut config = config_for(&workspace);
    let directory = workspace.path("users-dir");
    std::fs::create_dir(&directory).expect("users directory");
    config.users = directory;

    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_USERS),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_users_decodes_visit_histories() {
    let workspace = Workspace::new();
    let users = load_users(&workspace.write_users()).expect("users should decode");

    assert_eq!(users.len(), 2);
    let visitor = users.first().expect("visitor");
    assert_eq!(visitor.id, user_id(VISITOR_ID));
    assert_eq!(visitor.visits.len(), 2);
}

#[rstest]
fn load_users_defaults_missing_visits() {
    let workspace = Workspace::new();
    let path = workspace.path("users.json");
    let payload = format!(r#"[{{"id":"{VISITOR_ID}","name":"newcomer"}}]"#);
    write_utf8(&path, payload.as_bytes());

    let users = load_users(&path).expect("users should decode");
    let newcomer = users.first().expect("newcomer");
    assert!(newcomer.visits.is_empty());
}

#[rstest]
fn load_users_reports_invalid_json() {
    let workspace = Workspace::new();
    let path = workspace.path("users.json");
    write_utf8(&path, b"[{ not json");

    let err = load_users(&path).expect_err("expected parse failure");
    match err {
        CliError::ParseUsers { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseUsers, found {other:?}"),
    }
}

#[rstest]
fn load_users_reports_missing_file() {
    let workspace = Workspace::new();
    let err = load_users(&workspace.path("nope.json")).expect_err("expected open failure");
    match err {
        CliError::OpenUsers { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected OpenUsers, found {other:?}"),
    }
}

#[rstest]
fn json_catalog_reads_attractions() {
    let workspace = Workspace::new();
    let catalog = JsonFileCatalog::new(workspace.write_catalog());

    let attractions = catalog.list_attractions().expect("catalog should load");
    assert_eq!(attractions.len(), 7);
    let first = attractions.first().expect("first attraction");
    assert_eq!(first.id.to_string(), FOUNTAIN_ID);
}

#[rstest]
fn json_catalog_reports_unavailable_file() {
    let workspace = Workspace::new();
    let catalog = JsonFileCatalog::new(workspace.path("missing.json"));

    let err = catalog.list_attractions().expect_err("expected failure");
    assert!(matches!(err, CatalogError::Unavailable { .. }));
}

#[rstest]
fn json_catalog_reports_malformed_file() {
    let workspace = Workspace::new();
    let path = workspace.path("catalog.json");
    write_utf8(&path, br#"{"not": "an array"}"#);

    let err = JsonFileCatalog::new(path)
        .list_attractions()
        .expect_err("expected failure");
    assert!(matches!(err, CatalogError::Malformed { .. }));
}

#[rstest]
fn json_catalog_rejects_out_of_range_locations() {
    let workspace = Workspace::new();
    let path = workspace.path("catalog.json");
    let payload = format!(
        r#"[{{"id":"{FOUNTAIN_ID}","name":"Nowhere","location":{{"latitude":500.0,"longitude":-999.0}}}}]"#
    );
    write_utf8(&path, payload.as_bytes());

    let err = JsonFileCatalog::new(path)
        .list_attractions()
        .expect_err("out of range location should fail");
    match err {
        CatalogError::Malformed { message } => {
            assert!(message.contains("latitude 500"), "got {message}");
        }
        other => panic!("expected Malformed, found {other:?}"),
    }
}

#[rstest]
fn execute_rewards_rejects_out_of_range_catalog() {
    let workspace = Workspace::new();
    let config = config_for(&workspace);
    let payload = format!(
        r#"[{{"id":"{FOUNTAIN_ID}","name":"Nowhere","location":{{"latitude":500.0,"longitude":0.0}}}}]"#
    );
    write_utf8(&config.catalog, payload.as_bytes());

    let err = execute_rewards(&config).expect_err("malformed catalog should fail");
    match err {
        CliError::BuildEngine(EngineBuildError::Catalog(CatalogError::Malformed { .. })) => {}
        other => panic!("expected a malformed catalog, found {other:?}"),
    }
}

#[rstest]
fn load_users_rejects_out_of_range_visits() {
    let workspace = Workspace::new();
    let path = workspace.path("users.json");
    let payload = format!(
        r#"[{{"id":"{VISITOR_ID}","name":"lost","visits":[{{"location":{{"latitude":0.0,"longitude":-999.0}},"time_visited":"2024-05-01T09:00:00Z"}}]}}]"#
    );
    write_utf8(&path, payload.as_bytes());

    let err = load_users(&path).expect_err("out of range visit should fail");
    match err {
        CliError::ParseUsers { source, .. } => {
            assert!(source.to_string().contains("longitude -999"), "got {source}");
        }
        other => panic!("expected ParseUsers, found {other:?}"),
    }
}

#[rstest]
fn execute_rewards_attributes_nearby_visits_once() {
    let workspace = Workspace::new();
    let config = config_for(&workspace);

    let summaries = execute_rewards(&config).expect("rewards should run");
    assert_eq!(summaries.len(), 2);

    let visitor = summaries.first().expect("visitor summary");
    assert_eq!(visitor.user_id, user_id(VISITOR_ID));
    assert_eq!(visitor.rewards.len(), 1, "two visits, one attraction, one reward");
    assert_eq!(visitor.failed_pairs, 0);
    let reward = visitor.rewards.first().expect("reward");
    assert_eq!(reward.attraction.id.to_string(), FOUNTAIN_ID);
    assert!(SEEDED_POINTS_RANGE.contains(&reward.reward_points));
    assert_eq!(visitor.total_points, u64::from(reward.reward_points));

    let stay_at_home = summaries.get(1).expect("second summary");
    assert_eq!(stay_at_home.user_id, user_id(STAY_AT_HOME_ID));
    assert!(stay_at_home.rewards.is_empty());
    assert_eq!(stay_at_home.total_points, 0);
}

#[rstest]
fn execute_rewards_is_deterministic_for_a_seed() {
    let workspace = Workspace::new();
    let config = config_for(&workspace);

    let first = execute_rewards(&config).expect("first run");
    let second = execute_rewards(&config).expect("second run");
    let points = |summaries: &[crate::rewards::UserRewards]| -> Vec<u64> {
        summaries.iter().map(|summary| summary.total_points).collect()
    };
    assert_eq!(points(&first), points(&second));
}

#[rstest]
fn execute_rewards_rejects_zero_workers() {
    let workspace = Workspace::new();
    let mut config = config_for(&workspace);
    config.engine = config.engine.with_worker_capacity(0);

    let err = execute_rewards(&config).expect_err("zero workers should fail");
    match err {
        CliError::BuildEngine(EngineBuildError::ZeroWorkerCapacity) => {}
        other => panic!("expected ZeroWorkerCapacity, found {other:?}"),
    }
}
