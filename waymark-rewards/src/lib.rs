//! Concurrent reward attribution for Waymark users.
//!
//! [`RewardAttributionEngine`] matches a user's visited locations against the
//! attraction catalog and grants points for every attraction a visit reached.
//! Pair evaluations run on a bounded [`WorkerPool`]; point lookups go through
//! a get-or-compute [`RewardPointCache`] so the oracle is asked at most once
//! per (attraction, user) pair.

#![forbid(unsafe_code)]

mod cache;
mod engine;
mod error;
mod oracle;
mod pool;
mod report;

pub use cache::RewardPointCache;
pub use engine::{
    AttributionHandle, EngineConfig, NEARBY_ATTRACTION_COUNT, RewardAttributionEngine,
};
pub use error::{AttributionError, EngineBuildError, PairFailureKind};
pub use oracle::{SEEDED_POINTS_RANGE, SeededPointOracle};
pub use pool::{DEFAULT_WORKER_CAPACITY, WorkerPool};
pub use report::{AttractionDistance, AttributionReport, NearbyAttraction, PairFailure};
