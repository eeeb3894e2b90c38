use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{Coordinate, RewardLedger, UserId, VisitedLocation, VisitedLocationLog};

/// A traveller with a visit history and the rewards earned from it.
///
/// The reward ledger is reference counted so in-flight attribution tasks can
/// keep writing to it after the caller stops waiting.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use waymark_core::{Coordinate, User, UserId};
///
/// let user = User::new(UserId::random(), "internalUser0");
/// user.record_visit(Coordinate::new(33.8, -117.9), Utc::now());
/// assert_eq!(user.visited_locations().len(), 1);
/// assert!(user.rewards().is_empty());
/// ```
#[derive(Debug)]
pub struct User {
    id: UserId,
    name: String,
    history: VisitedLocationLog,
    rewards: Arc<RewardLedger>,
}

impl User {
    /// Create a user with no visits and no rewards.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self::with_history(id, name, Vec::new())
    }

    /// Create a user whose history starts with `visits`.
    pub fn with_history(id: UserId, name: impl Into<String>, visits: Vec<VisitedLocation>) -> Self {
        Self {
            id,
            name: name.into(),
            history: VisitedLocationLog::with_visits(visits),
            rewards: Arc::new(RewardLedger::default()),
        }
    }

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a visit at `location` and return the stored record.
    pub fn record_visit(&self, location: Coordinate, time_visited: DateTime<Utc>) -> VisitedLocation {
        let visit = VisitedLocation::new(self.id, location, time_visited);
        self.history.push(visit.clone());
        visit
    }

    /// Snapshot of the visit history in recording order.
    #[must_use]
    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.history.snapshot()
    }

    /// Most recent visit, if any.
    #[must_use]
    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.history.last()
    }

    /// Shared handle to the user's reward ledger.
    #[must_use]
    pub const fn rewards(&self) -> &Arc<RewardLedger> {
        &self.rewards
    }
}
