//! Concurrent reward attribution.
//!
//! [`RewardAttributionEngine::attribute_rewards`] snapshots a user's visits
//! and rewarded attractions, then evaluates every (visit, unrewarded
//! attraction) pair as its own task on the shared [`WorkerPool`]. Each
//! matching pair prices itself through the [`RewardPointCache`] and appends
//! to the user's ledger with an atomic check-and-insert, so an attraction is
//! rewarded at most once however many visits reach it.
//!
//! The returned [`AttributionHandle`] resolves once every dispatched pair
//! has finished. Dropping it does not cancel the work.

use std::future::Future;
use std::num::NonZeroUsize;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::Utc;
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use waymark_core::proximity::{
    DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES, DEFAULT_PROXIMITY_BUFFER_MILES,
};
use waymark_core::{
    Attraction, AttractionCatalog, Coordinate, OracleError, ProximityClassifier, RewardLedger,
    RewardPointOracle, RewardRecord, User, UserId, VisitedLocation, distance_miles,
};

use crate::pool::DEFAULT_WORKER_CAPACITY;
use crate::{
    AttractionDistance, AttributionError, AttributionReport, EngineBuildError, NearbyAttraction,
    PairFailure, PairFailureKind, RewardPointCache, WorkerPool,
};

/// How many attractions [`RewardAttributionEngine::nearby_attractions`]
/// returns.
pub const NEARBY_ATTRACTION_COUNT: usize = 5;

/// Construction-time settings for [`RewardAttributionEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Reward-eligibility radius in statute miles.
    pub proximity_buffer_miles: f64,
    /// Discovery radius in statute miles.
    pub attraction_proximity_range_miles: f64,
    /// Slots in the engine's own worker pool.
    pub worker_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proximity_buffer_miles: DEFAULT_PROXIMITY_BUFFER_MILES,
            attraction_proximity_range_miles: DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES,
            worker_capacity: DEFAULT_WORKER_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default radii and capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reward-eligibility radius.
    #[must_use]
    pub const fn with_proximity_buffer_miles(mut self, miles: f64) -> Self {
        self.proximity_buffer_miles = miles;
        self
    }

    /// Set the discovery radius.
    #[must_use]
    pub const fn with_attraction_proximity_range_miles(mut self, miles: f64) -> Self {
        self.attraction_proximity_range_miles = miles;
        self
    }

    /// Set the worker pool capacity.
    #[must_use]
    pub const fn with_worker_capacity(mut self, capacity: usize) -> Self {
        self.worker_capacity = capacity;
        self
    }
}

/// State shared by the engine and every task it spawns.
#[derive(Debug)]
struct Shared {
    attractions: Vec<Arc<Attraction>>,
    classifier: ProximityClassifier,
    cache: RewardPointCache,
}

/// Attributes reward points to users for visits near attractions.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use chrono::Utc;
/// use waymark_core::test_support::{FixedPointOracle, StaticCatalog};
/// use waymark_core::{Attraction, AttractionId, Coordinate, User, UserId};
/// use waymark_rewards::{EngineConfig, RewardAttributionEngine};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pier = Attraction::new(AttractionId::random(), "Pier", Coordinate::new(0.0, 0.0));
/// let engine = RewardAttributionEngine::new(
///     &StaticCatalog::with_attraction(pier),
///     Arc::new(FixedPointOracle::new(50)),
///     EngineConfig::default(),
/// )?;
///
/// let user = Arc::new(User::new(UserId::random(), "walker"));
/// user.record_visit(Coordinate::new(0.0001, 0.0), Utc::now());
///
/// let report = engine.attribute_rewards(&user).await?;
/// assert_eq!(report.rewards_added, 1);
/// assert_eq!(user.rewards().total_points(), 50);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RewardAttributionEngine {
    shared: Arc<Shared>,
    pool: WorkerPool,
}

impl RewardAttributionEngine {
    /// Load the attraction catalog and build an engine with its own pool.
    ///
    /// # Errors
    /// Returns [`EngineBuildError`] when the catalog cannot be read or is
    /// empty, when a radius is invalid, or when the capacity is zero.
    pub fn new(
        catalog: &dyn AttractionCatalog,
        oracle: Arc<dyn RewardPointOracle>,
        config: EngineConfig,
    ) -> Result<Self, EngineBuildError> {
        let capacity = NonZeroUsize::new(config.worker_capacity)
            .ok_or(EngineBuildError::ZeroWorkerCapacity)?;
        let classifier = ProximityClassifier::new(
            config.proximity_buffer_miles,
            config.attraction_proximity_range_miles,
        )?;
        let attractions = catalog
            .list_attractions()
            .map_err(EngineBuildError::Catalog)?;
        if attractions.is_empty() {
            return Err(EngineBuildError::EmptyCatalog);
        }
        info!(
            "loaded {} attractions; worker capacity {}",
            attractions.len(),
            capacity
        );

        Ok(Self {
            shared: Arc::new(Shared {
                attractions: attractions.into_iter().map(Arc::new).collect(),
                classifier,
                cache: RewardPointCache::new(oracle),
            }),
            pool: WorkerPool::new(capacity),
        })
    }

    /// Draw pair tasks from `pool` instead of the engine's own pool.
    #[must_use]
    pub fn with_worker_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    /// Distance thresholds, adjustable while attribution runs.
    #[must_use]
    pub fn classifier(&self) -> &ProximityClassifier {
        &self.shared.classifier
    }

    /// Memoized reward points.
    #[must_use]
    pub fn cache(&self) -> &RewardPointCache {
        &self.shared.cache
    }

    /// Pool that bounds pair evaluation.
    #[must_use]
    pub const fn worker_pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Attractions loaded at construction, in catalog order.
    pub fn attractions(&self) -> impl ExactSizeIterator<Item = &Attraction> {
        self.shared.attractions.iter().map(Arc::as_ref)
    }

    /// Start attributing rewards for `user` and return without waiting.
    ///
    /// The visit history and the set of rewarded attractions are read once,
    /// before this method returns. Must be called within a Tokio runtime.
    pub fn attribute_rewards(&self, user: &User) -> AttributionHandle {
        let visits = user.visited_locations();
        let rewarded = user.rewards().rewarded_attractions();
        let unrewarded: Vec<&Arc<Attraction>> = self
            .shared
            .attractions
            .iter()
            .filter(|attraction| !rewarded.contains(&attraction.id))
            .collect();
        let pairs: Vec<(VisitedLocation, Arc<Attraction>)> = visits
            .iter()
            .flat_map(|visit| {
                unrewarded
                    .iter()
                    .map(move |attraction| (visit.clone(), Arc::clone(attraction)))
            })
            .collect();

        let job = Attribution {
            shared: Arc::clone(&self.shared),
            pool: self.pool.clone(),
            ledger: Arc::clone(user.rewards()),
            user_id: user.id(),
        };
        AttributionHandle {
            inner: tokio::spawn(job.run(pairs)),
        }
    }

    /// Record a visit at `location` for `user` and attribute rewards for the
    /// updated history.
    pub fn track_visit(&self, user: &User, location: Coordinate) -> AttributionHandle {
        let visit = user.record_visit(location, Utc::now());
        debug!(
            "user {} visited ({}, {})",
            visit.user_id, visit.location.latitude, visit.location.longitude
        );
        self.attribute_rewards(user)
    }

    /// Attractions within the discovery range of `location`, nearest first.
    #[must_use]
    pub fn attractions_within_discovery_range(
        &self,
        location: Coordinate,
    ) -> Vec<AttractionDistance> {
        let classifier = &self.shared.classifier;
        let mut found: Vec<AttractionDistance> = self
            .attractions()
            .filter(|attraction| classifier.is_within_discovery_range(attraction, location))
            .map(|attraction| AttractionDistance {
                attraction: attraction.clone(),
                distance_miles: distance_miles(attraction.location, location),
            })
            .collect();
        found.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
        found
    }

    /// The [`NEARBY_ATTRACTION_COUNT`] attractions closest to `location`,
    /// with the points `user` would earn at each.
    ///
    /// Attractions whose points cannot be resolved are kept with
    /// `reward_points` set to `None`.
    pub async fn nearby_attractions(
        &self,
        user: UserId,
        location: Coordinate,
    ) -> Vec<NearbyAttraction> {
        let mut by_distance: Vec<(f64, &Attraction)> = self
            .attractions()
            .map(|attraction| (distance_miles(attraction.location, location), attraction))
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
        by_distance.truncate(NEARBY_ATTRACTION_COUNT);

        let mut nearby = Vec::with_capacity(by_distance.len());
        for (distance, attraction) in by_distance {
            let reward_points = match self.shared.cache.resolve(attraction.id, user).await {
                Ok(points) => Some(points),
                Err(err) => {
                    warn!("{err}");
                    None
                }
            };
            nearby.push(NearbyAttraction {
                attraction: attraction.clone(),
                distance_miles: distance,
                reward_points,
            });
        }
        nearby
    }
}

/// Resolves to the [`AttributionReport`] once every dispatched pair has
/// finished.
///
/// Dropping the handle detaches the work; rewards it appends later remain
/// in the user's ledger. Race it against `tokio::time::timeout` to bound the
/// wait.
#[derive(Debug)]
#[must_use = "attribution runs in the background; await the handle to observe its report"]
pub struct AttributionHandle {
    inner: JoinHandle<AttributionReport>,
}

impl AttributionHandle {
    /// Whether the join barrier has been reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Future for AttributionHandle {
    type Output = Result<AttributionReport, AttributionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner)
            .poll(cx)
            .map(|joined| joined.map_err(AttributionError::from))
    }
}

/// What a single pair task concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairOutcome {
    OutOfRange,
    AlreadyRewarded,
    Rewarded,
    LostRace,
}

impl PairOutcome {
    const fn is_match(self) -> bool {
        !matches!(self, Self::OutOfRange)
    }
}

/// One `attribute_rewards` call, moved into its coordinating task.
struct Attribution {
    shared: Arc<Shared>,
    pool: WorkerPool,
    ledger: Arc<RewardLedger>,
    user_id: UserId,
}

type PendingPair = (
    VisitedLocation,
    Arc<Attraction>,
    JoinHandle<Result<PairOutcome, OracleError>>,
);

impl Attribution {
    async fn run(self, pairs: Vec<(VisitedLocation, Arc<Attraction>)>) -> AttributionReport {
        let mut report = AttributionReport::new(self.user_id);
        debug!("user {}: dispatching {} pairs", self.user_id, pairs.len());

        let mut pending: Vec<PendingPair> = Vec::with_capacity(pairs.len());
        for (visit, attraction) in pairs {
            let Ok(permit) = self.pool.acquire().await else {
                report.failures.push(PairFailure {
                    visited_location: visit,
                    attraction: attraction.id,
                    kind: PairFailureKind::Cancelled,
                });
                continue;
            };
            let task = {
                let shared = Arc::clone(&self.shared);
                let ledger = Arc::clone(&self.ledger);
                let pair_visit = visit.clone();
                let pair_attraction = Arc::clone(&attraction);
                let user_id = self.user_id;
                tokio::spawn(async move {
                    let outcome =
                        evaluate_pair(&shared, &ledger, user_id, pair_visit, &pair_attraction)
                            .await;
                    drop(permit);
                    outcome
                })
            };
            report.pairs_dispatched += 1;
            pending.push((visit, attraction, task));
        }

        for (visit, attraction, task) in pending {
            let kind = match task.await {
                Ok(Ok(outcome)) => {
                    report.matches += usize::from(outcome.is_match());
                    report.rewards_added += usize::from(outcome == PairOutcome::Rewarded);
                    continue;
                }
                Ok(Err(err)) => {
                    report.matches += 1;
                    PairFailureKind::Oracle(err)
                }
                Err(err) if err.is_panic() => PairFailureKind::Panicked,
                Err(_) => PairFailureKind::Cancelled,
            };
            warn!(
                "user {}: attraction {} ({}) not evaluated: {kind}",
                self.user_id, attraction.id, attraction.name
            );
            report.failures.push(PairFailure {
                visited_location: visit,
                attraction: attraction.id,
                kind,
            });
        }

        debug!(
            "user {}: {} matches, {} rewards added, {} failures",
            self.user_id,
            report.matches,
            report.rewards_added,
            report.failures.len()
        );
        report
    }
}

async fn evaluate_pair(
    shared: &Shared,
    ledger: &RewardLedger,
    user_id: UserId,
    visit: VisitedLocation,
    attraction: &Attraction,
) -> Result<PairOutcome, OracleError> {
    if !shared.classifier.is_near_for_reward(&visit, attraction) {
        return Ok(PairOutcome::OutOfRange);
    }
    if ledger.contains(attraction.id) {
        return Ok(PairOutcome::AlreadyRewarded);
    }
    let points = shared.cache.resolve(attraction.id, user_id).await?;
    let record = RewardRecord::new(visit, attraction.clone(), points);
    if ledger.try_insert(record) {
        Ok(PairOutcome::Rewarded)
    } else {
        Ok(PairOutcome::LostRace)
    }
}
