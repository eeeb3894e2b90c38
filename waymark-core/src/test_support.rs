//! Test-only collaborators for unit, behaviour, and benchmark code.
//!
//! The catalog fakes return fixed data; the oracle fakes count their calls so
//! tests can assert how often the points service was consulted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    Attraction, AttractionCatalog, AttractionId, CatalogError, OracleError, RewardPointOracle,
    UserId,
};

/// In-memory `AttractionCatalog` returning a fixed list.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    attractions: Vec<Attraction>,
}

impl StaticCatalog {
    /// Create a catalog containing a single attraction.
    #[must_use]
    pub fn with_attraction(attraction: Attraction) -> Self {
        Self::with_attractions(std::iter::once(attraction))
    }

    /// Create a catalog from a collection of attractions.
    pub fn with_attractions<I>(attractions: I) -> Self
    where
        I: IntoIterator<Item = Attraction>,
    {
        Self {
            attractions: attractions.into_iter().collect(),
        }
    }
}

impl AttractionCatalog for StaticCatalog {
    fn list_attractions(&self) -> Result<Vec<Attraction>, CatalogError> {
        Ok(self.attractions.clone())
    }
}

/// `AttractionCatalog` whose source can never be reached.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableCatalog;

impl AttractionCatalog for UnreachableCatalog {
    fn list_attractions(&self) -> Result<Vec<Attraction>, CatalogError> {
        Err(CatalogError::Unavailable {
            message: "connection refused".to_owned(),
        })
    }
}

/// Oracle granting the same number of points to every pair.
///
/// An optional delay keeps calls in flight long enough for concurrent
/// callers to overlap.
#[derive(Debug, Default)]
pub struct FixedPointOracle {
    points: u32,
    delay: Duration,
    calls: AtomicUsize,
}

impl FixedPointOracle {
    /// Grant `points` immediately.
    #[must_use]
    pub const fn new(points: u32) -> Self {
        Self::with_delay(points, Duration::ZERO)
    }

    /// Grant `points` after sleeping for `delay`.
    #[must_use]
    pub const fn with_delay(points: u32, delay: Duration) -> Self {
        Self {
            points,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the oracle has been consulted.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardPointOracle for FixedPointOracle {
    async fn attraction_reward_points(
        &self,
        _attraction: AttractionId,
        _user: UserId,
    ) -> Result<u32, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.points)
    }
}

/// Oracle that fails a fixed number of times before answering.
#[derive(Debug)]
pub struct FlakyOracle {
    points: u32,
    failures_remaining: AtomicUsize,
    calls: AtomicUsize,
}

impl FlakyOracle {
    /// Fail the first `failures` calls, then grant `points`.
    #[must_use]
    pub const fn new(points: u32, failures: usize) -> Self {
        Self {
            points,
            failures_remaining: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call.
    #[must_use]
    pub const fn always_failing() -> Self {
        Self::new(0, usize::MAX)
    }

    /// Number of times the oracle has been consulted.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardPointOracle for FlakyOracle {
    async fn attraction_reward_points(
        &self,
        attraction: AttractionId,
        user: UserId,
    ) -> Result<u32, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(OracleError::Unavailable {
                attraction,
                user,
                message: "points service timed out".to_owned(),
            });
        }
        Ok(self.points)
    }
}
