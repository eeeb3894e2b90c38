//! Values returned by attribution and nearby-attraction queries.

use waymark_core::{Attraction, AttractionId, UserId, VisitedLocation};

use crate::PairFailureKind;

/// Outcome of one `attribute_rewards` call.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionReport {
    /// User whose history was evaluated.
    pub user_id: UserId,
    /// Pairs handed to the worker pool.
    pub pairs_dispatched: usize,
    /// Pairs whose visit fell inside the proximity buffer.
    pub matches: usize,
    /// Records this call appended to the user's ledger.
    pub rewards_added: usize,
    /// Pairs that could not be evaluated.
    pub failures: Vec<PairFailure>,
}

impl AttributionReport {
    pub(crate) const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            pairs_dispatched: 0,
            matches: 0,
            rewards_added: 0,
            failures: Vec::new(),
        }
    }

    /// Whether every dispatched pair was evaluated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A pair whose evaluation failed.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFailure {
    /// Visit half of the pair.
    pub visited_location: VisitedLocation,
    /// Attraction half of the pair.
    pub attraction: AttractionId,
    /// What went wrong.
    pub kind: PairFailureKind,
}

/// An attraction and how far it is from a queried location.
#[derive(Debug, Clone, PartialEq)]
pub struct AttractionDistance {
    /// The attraction.
    pub attraction: Attraction,
    /// Great-circle distance in statute miles.
    pub distance_miles: f64,
}

/// A nearby attraction annotated with what the user would earn there.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyAttraction {
    /// The attraction.
    pub attraction: Attraction,
    /// Great-circle distance in statute miles.
    pub distance_miles: f64,
    /// Points the user would earn, or `None` when the oracle failed.
    pub reward_points: Option<u32>,
}
