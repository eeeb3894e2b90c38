//! Per-user reward accumulation.
//!
//! A [`RewardLedger`] holds at most one [`RewardRecord`] per attraction. The
//! uniqueness check and the append happen under one lock, so concurrent
//! tasks that match the same attraction from different visits cannot both
//! succeed.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Attraction, AttractionId, VisitedLocation};

/// A reward granted because a visit came close enough to an attraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardRecord {
    /// Visit that triggered the reward.
    pub visited_location: VisitedLocation,
    /// Attraction that was reached.
    pub attraction: Attraction,
    /// Points granted by the oracle.
    pub reward_points: u32,
}

impl RewardRecord {
    /// Construct a `RewardRecord`.
    #[must_use]
    pub const fn new(
        visited_location: VisitedLocation,
        attraction: Attraction,
        reward_points: u32,
    ) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    records: Vec<RewardRecord>,
    rewarded: HashSet<AttractionId>,
}

/// Insertion-ordered reward records, unique by attraction.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use waymark_core::{
///     Attraction, AttractionId, Coordinate, RewardLedger, RewardRecord, UserId, VisitedLocation,
/// };
///
/// let attraction = Attraction::new(AttractionId::random(), "Pier", Coordinate::new(0.0, 0.0));
/// let visit = VisitedLocation::new(UserId::random(), Coordinate::new(0.0, 0.0), Utc::now());
/// let ledger = RewardLedger::default();
///
/// assert!(ledger.try_insert(RewardRecord::new(visit.clone(), attraction.clone(), 10)));
/// assert!(!ledger.try_insert(RewardRecord::new(visit, attraction, 99)));
/// assert_eq!(ledger.total_points(), 10);
/// ```
#[derive(Debug, Default)]
pub struct RewardLedger {
    state: Mutex<LedgerState>,
}

impl RewardLedger {
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // Every mutation completes before the guard drops, so the state is
        // consistent even if another holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `record` unless its attraction has already been rewarded.
    ///
    /// Returns `true` when the record was stored and `false` when an earlier
    /// record for the same attraction won.
    pub fn try_insert(&self, record: RewardRecord) -> bool {
        let mut state = self.lock();
        if !state.rewarded.insert(record.attraction.id) {
            return false;
        }
        state.records.push(record);
        debug_assert_eq!(
            state.records.len(),
            state.rewarded.len(),
            "reward ledger holds a duplicate attraction"
        );
        true
    }

    /// Report whether `attraction` has already been rewarded.
    #[must_use]
    pub fn contains(&self, attraction: AttractionId) -> bool {
        self.lock().rewarded.contains(&attraction)
    }

    /// Identifiers of every rewarded attraction.
    #[must_use]
    pub fn rewarded_attractions(&self) -> HashSet<AttractionId> {
        self.lock().rewarded.clone()
    }

    /// Copy the records in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<RewardRecord> {
        self.lock().records.clone()
    }

    /// Sum of points across all records.
    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.lock()
            .records
            .iter()
            .map(|record| u64::from(record.reward_points))
            .sum()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Report whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
