//! Reward-point oracle boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::{AttractionId, UserId};

/// Errors from [`RewardPointOracle::attraction_reward_points`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The points service failed in a way a later retry may not repeat.
    #[error("reward points for attraction {attraction} and user {user} are unavailable: {message}")]
    Unavailable {
        /// Attraction being priced.
        attraction: AttractionId,
        /// User being priced.
        user: UserId,
        /// Description of the underlying failure.
        message: String,
    },
}

/// Authoritative source of reward points for an (attraction, user) pair.
///
/// Calls may be slow or remote. Implementations must be idempotent for a
/// given pair over the process lifetime, since callers memoize the first
/// successful answer.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use waymark_core::{AttractionId, OracleError, RewardPointOracle, UserId};
///
/// struct FlatRate;
///
/// #[async_trait]
/// impl RewardPointOracle for FlatRate {
///     async fn attraction_reward_points(
///         &self,
///         _attraction: AttractionId,
///         _user: UserId,
///     ) -> Result<u32, OracleError> {
///         Ok(100)
///     }
/// }
/// ```
#[async_trait]
pub trait RewardPointOracle: Send + Sync {
    /// Return the points `user` earns for visiting `attraction`.
    async fn attraction_reward_points(
        &self,
        attraction: AttractionId,
        user: UserId,
    ) -> Result<u32, OracleError>;
}
