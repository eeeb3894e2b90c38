//! Deterministic stand-in for a remote points service.

use std::ops::RangeInclusive;

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use waymark_core::{AttractionId, OracleError, RewardPointOracle, UserId};

/// Points granted by [`SeededPointOracle`] always fall in this range.
pub const SEEDED_POINTS_RANGE: RangeInclusive<u32> = 1..=1000;

/// Oracle deriving stable pseudo-random points from the pair identifiers.
///
/// The same seed and pair always yield the same points, which keeps CLI
/// output and benchmarks reproducible without a live points service.
///
/// # Examples
/// ```
/// # tokio_test_block(async {
/// use waymark_core::{AttractionId, RewardPointOracle, UserId};
/// use waymark_rewards::{SEEDED_POINTS_RANGE, SeededPointOracle};
///
/// let oracle = SeededPointOracle::new(7);
/// let (attraction, user) = (AttractionId::random(), UserId::random());
/// let first = oracle.attraction_reward_points(attraction, user).await?;
/// let again = oracle.attraction_reward_points(attraction, user).await?;
/// assert_eq!(first, again);
/// assert!(SEEDED_POINTS_RANGE.contains(&first));
/// # Ok::<(), waymark_core::OracleError>(())
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededPointOracle {
    seed: u64,
}

impl SeededPointOracle {
    /// Create an oracle whose answers are keyed by `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn points_for(self, attraction: AttractionId, user: UserId) -> u32 {
        let mut key = [0_u8; 32];
        let pair_bytes = attraction
            .as_uuid()
            .as_bytes()
            .iter()
            .chain(user.as_uuid().as_bytes());
        for (slot, byte) in key.iter_mut().zip(pair_bytes) {
            *slot = *byte;
        }
        let mut rng = ChaCha8Rng::from_seed(key);
        rng.set_stream(self.seed);
        rng.gen_range(SEEDED_POINTS_RANGE)
    }
}

#[async_trait]
impl RewardPointOracle for SeededPointOracle {
    async fn attraction_reward_points(
        &self,
        attraction: AttractionId,
        user: UserId,
    ) -> Result<u32, OracleError> {
        Ok(self.points_for(attraction, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn points_are_stable_per_seed_and_pair() {
        let (attraction, user) = (AttractionId::random(), UserId::random());
        let oracle = SeededPointOracle::new(42);
        assert_eq!(
            oracle.points_for(attraction, user),
            SeededPointOracle::new(42).points_for(attraction, user)
        );
    }

    #[rstest]
    fn points_stay_in_range() {
        let oracle = SeededPointOracle::new(1);
        for _ in 0..500 {
            let points = oracle.points_for(AttractionId::random(), UserId::random());
            assert!(SEEDED_POINTS_RANGE.contains(&points), "{points} out of range");
        }
    }

    #[rstest]
    fn seeds_vary_the_answers() {
        let (attraction, user) = (AttractionId::random(), UserId::random());
        let answers: std::collections::HashSet<u32> = (0..16)
            .map(|seed| SeededPointOracle::new(seed).points_for(attraction, user))
            .collect();
        assert!(answers.len() > 1);
    }
}
