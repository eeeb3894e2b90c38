//! Facade crate for the Waymark reward attribution engine.
//!
//! This crate re-exports the domain types from `waymark-core` and the
//! concurrent attribution engine from `waymark-rewards`. Test doubles are
//! available behind the `test-support` feature.

#![forbid(unsafe_code)]

pub use waymark_core::{
    Attraction, AttractionCatalog, AttractionId, CatalogError, Coordinate, CoordinateError,
    OracleError, ProximityClassifier, RewardLedger, RewardPointOracle, RewardRecord,
    ThresholdError, User, UserId, VisitedLocation, VisitedLocationLog, distance_miles,
};

pub use waymark_rewards::{
    AttractionDistance, AttributionError, AttributionHandle, AttributionReport, EngineBuildError,
    EngineConfig, NEARBY_ATTRACTION_COUNT, NearbyAttraction, PairFailure, PairFailureKind,
    RewardAttributionEngine, RewardPointCache, SeededPointOracle, WorkerPool,
};

#[cfg(feature = "test-support")]
pub use waymark_core::test_support;
