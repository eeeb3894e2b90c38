//! Timestamped visits and the append-only history that holds them.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::{Coordinate, UserId};

/// A position recorded for a user at a point in time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisitedLocation {
    /// User the visit belongs to.
    pub user_id: UserId,
    /// Where the user was.
    pub location: Coordinate,
    /// When the position was recorded.
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    /// Construct a `VisitedLocation`.
    #[must_use]
    pub const fn new(user_id: UserId, location: Coordinate, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }
}

/// Ordered, append-only visit history shared between writers and readers.
///
/// Readers take a [`snapshot`](Self::snapshot); visits appended afterwards
/// are not reflected in it.
#[derive(Debug, Default)]
pub struct VisitedLocationLog {
    visits: RwLock<Vec<VisitedLocation>>,
}

impl VisitedLocationLog {
    /// Create a log pre-populated with `visits` in order.
    #[must_use]
    pub fn with_visits(visits: Vec<VisitedLocation>) -> Self {
        Self {
            visits: RwLock::new(visits),
        }
    }

    /// Append a visit to the end of the history.
    pub fn push(&self, visit: VisitedLocation) {
        // Appends never leave the vector half-written, so a poisoned lock is
        // still consistent.
        self.visits
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(visit);
    }

    /// Copy the current history.
    #[must_use]
    pub fn snapshot(&self) -> Vec<VisitedLocation> {
        self.visits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the most recent visit, if any.
    #[must_use]
    pub fn last(&self) -> Option<VisitedLocation> {
        self.visits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of recorded visits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Report whether no visits have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
