//! Memoized reward-point lookups.
//!
//! The oracle is the slowest collaborator in attribution, and its answer for
//! an (attraction, user) pair never changes. [`RewardPointCache`] keeps one
//! [`OnceCell`] per pair so that concurrent callers share a single in-flight
//! oracle call, and later callers read the stored value.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use waymark_core::{AttractionId, OracleError, RewardPointOracle, UserId};

type PairKey = (AttractionId, UserId);

/// Get-or-compute cache in front of a [`RewardPointOracle`].
///
/// Entries are never evicted. A failed lookup leaves its entry empty, so the
/// next caller for that pair asks the oracle again.
pub struct RewardPointCache {
    oracle: Arc<dyn RewardPointOracle>,
    entries: DashMap<PairKey, Arc<OnceCell<u32>>>,
}

impl RewardPointCache {
    /// Wrap `oracle` with an empty cache.
    #[must_use]
    pub fn new(oracle: Arc<dyn RewardPointOracle>) -> Self {
        Self {
            oracle,
            entries: DashMap::new(),
        }
    }

    /// Return the points for `(attraction, user)`, calling the oracle at most
    /// once per pair across all concurrent callers.
    ///
    /// # Errors
    /// Propagates the [`OracleError`] of the call this request waited on.
    pub async fn resolve(&self, attraction: AttractionId, user: UserId) -> Result<u32, OracleError> {
        // Clone the cell out of the map so no shard lock is held across the
        // oracle call.
        let cell = Arc::clone(self.entries.entry((attraction, user)).or_default().value());
        let points = cell
            .get_or_try_init(|| self.oracle.attraction_reward_points(attraction, user))
            .await?;
        Ok(*points)
    }

    /// Stored points for a pair, without consulting the oracle.
    #[must_use]
    pub fn cached(&self, attraction: AttractionId, user: UserId) -> Option<u32> {
        self.entries
            .get(&(attraction, user))
            .and_then(|entry| entry.value().get().copied())
    }

    /// Number of pairs with a stored value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    /// Whether no pair has a stored value yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RewardPointCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardPointCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rstest::{fixture, rstest};
    use waymark_core::test_support::{FixedPointOracle, FlakyOracle};

    #[fixture]
    fn pair() -> PairKey {
        (AttractionId::random(), UserId::random())
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_oracle_call(pair: PairKey) {
        let oracle = Arc::new(FixedPointOracle::with_delay(75, Duration::from_millis(50)));
        let cache = Arc::new(RewardPointCache::new(oracle.clone()));
        let (attraction, user) = pair;

        let callers: Vec<_> = (0..32)
            .map(|_| {
                let shared = Arc::clone(&cache);
                tokio::spawn(async move { shared.resolve(attraction, user).await })
            })
            .collect();
        for caller in callers {
            let points = caller.await.expect("caller task").expect("oracle answer");
            assert_eq!(points, 75);
        }

        assert_eq!(oracle.calls(), 1);
        assert_eq!(cache.cached(attraction, user), Some(75));
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn hits_do_not_call_the_oracle(pair: PairKey) {
        let oracle = Arc::new(FixedPointOracle::new(10));
        let cache = RewardPointCache::new(oracle.clone());
        let (attraction, user) = pair;

        for _ in 0..3 {
            assert_eq!(cache.resolve(attraction, user).await.expect("points"), 10);
        }
        assert_eq!(oracle.calls(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn distinct_pairs_are_cached_separately() {
        let oracle = Arc::new(FixedPointOracle::new(10));
        let cache = RewardPointCache::new(oracle.clone());
        let attraction = AttractionId::random();

        cache
            .resolve(attraction, UserId::random())
            .await
            .expect("points");
        cache
            .resolve(attraction, UserId::random())
            .await
            .expect("points");

        assert_eq!(oracle.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_not_cached(pair: PairKey) {
        let oracle = Arc::new(FlakyOracle::new(40, 1));
        let cache = RewardPointCache::new(oracle.clone());
        let (attraction, user) = pair;

        let first = cache.resolve(attraction, user).await;
        assert!(matches!(first, Err(OracleError::Unavailable { .. })));
        assert_eq!(cache.cached(attraction, user), None);
        assert!(cache.is_empty());

        assert_eq!(cache.resolve(attraction, user).await.expect("retry"), 40);
        assert_eq!(oracle.calls(), 2);
        assert_eq!(cache.cached(attraction, user), Some(40));
    }
}
