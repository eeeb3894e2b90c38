//! Distance thresholds for reward eligibility and discovery.
//!
//! [`ProximityClassifier`] keeps two independent radii:
//!
//! - the *proximity buffer* decides whether a visit reached an attraction
//!   and therefore earns a reward;
//! - the *attraction proximity range* decides whether an attraction is worth
//!   showing to a user nearby.
//!
//! Both comparisons are inclusive and both radii can be changed at runtime
//! while attribution tasks are reading them.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::{Attraction, Coordinate, VisitedLocation, distance_miles};

/// Default reward-eligibility radius in statute miles.
pub const DEFAULT_PROXIMITY_BUFFER_MILES: f64 = 10.0;

/// Default discovery radius in statute miles.
pub const DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES: f64 = 200.0;

/// Errors returned when configuring a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ThresholdError {
    /// The radius was negative, NaN, or infinite.
    #[error("threshold {0} must be a finite, non-negative number of miles")]
    Invalid(f64),
}

fn validate(miles: f64) -> Result<f64, ThresholdError> {
    if miles.is_finite() && miles >= 0.0 {
        Ok(miles)
    } else {
        Err(ThresholdError::Invalid(miles))
    }
}

/// An `f64` readable and writable from many threads.
#[derive(Debug)]
struct AtomicMiles(AtomicU64);

impl AtomicMiles {
    fn new(miles: f64) -> Self {
        Self(AtomicU64::new(miles.to_bits()))
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, miles: f64) {
        self.0.store(miles.to_bits(), Ordering::Release);
    }
}

/// Classify distances between visits and attractions.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use waymark_core::{
///     Attraction, AttractionId, Coordinate, ProximityClassifier, UserId, VisitedLocation,
/// };
///
/// let classifier = ProximityClassifier::default();
/// let pier = Attraction::new(AttractionId::random(), "Pier", Coordinate::new(0.0, 0.0));
/// let visit = VisitedLocation::new(UserId::random(), Coordinate::new(0.0001, 0.0), Utc::now());
///
/// assert!(classifier.is_near_for_reward(&visit, &pier));
/// assert!(classifier.is_within_discovery_range(&pier, Coordinate::new(2.0, 0.0)));
/// ```
#[derive(Debug)]
pub struct ProximityClassifier {
    proximity_buffer: AtomicMiles,
    attraction_proximity_range: AtomicMiles,
}

impl Default for ProximityClassifier {
    fn default() -> Self {
        Self {
            proximity_buffer: AtomicMiles::new(DEFAULT_PROXIMITY_BUFFER_MILES),
            attraction_proximity_range: AtomicMiles::new(DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES),
        }
    }
}

impl ProximityClassifier {
    /// Build a classifier with explicit radii.
    ///
    /// # Errors
    /// Returns [`ThresholdError`] when either radius is negative or
    /// non-finite.
    pub fn new(
        proximity_buffer_miles: f64,
        attraction_proximity_range_miles: f64,
    ) -> Result<Self, ThresholdError> {
        Ok(Self {
            proximity_buffer: AtomicMiles::new(validate(proximity_buffer_miles)?),
            attraction_proximity_range: AtomicMiles::new(validate(
                attraction_proximity_range_miles,
            )?),
        })
    }

    /// Current reward-eligibility radius in miles.
    #[must_use]
    pub fn proximity_buffer(&self) -> f64 {
        self.proximity_buffer.load()
    }

    /// Replace the reward-eligibility radius.
    ///
    /// # Errors
    /// Returns [`ThresholdError`] for negative or non-finite values; the
    /// current radius is left unchanged.
    pub fn set_proximity_buffer(&self, miles: f64) -> Result<(), ThresholdError> {
        self.proximity_buffer.store(validate(miles)?);
        Ok(())
    }

    /// Restore the reward-eligibility radius to
    /// [`DEFAULT_PROXIMITY_BUFFER_MILES`].
    pub fn reset_proximity_buffer(&self) {
        self.proximity_buffer.store(DEFAULT_PROXIMITY_BUFFER_MILES);
    }

    /// Current discovery radius in miles.
    #[must_use]
    pub fn attraction_proximity_range(&self) -> f64 {
        self.attraction_proximity_range.load()
    }

    /// Replace the discovery radius.
    ///
    /// # Errors
    /// Returns [`ThresholdError`] for negative or non-finite values; the
    /// current radius is left unchanged.
    pub fn set_attraction_proximity_range(&self, miles: f64) -> Result<(), ThresholdError> {
        self.attraction_proximity_range.store(validate(miles)?);
        Ok(())
    }

    /// Report whether `location` lies within the discovery radius of
    /// `attraction`.
    #[must_use]
    pub fn is_within_discovery_range(&self, attraction: &Attraction, location: Coordinate) -> bool {
        distance_miles(attraction.location, location) <= self.attraction_proximity_range()
    }

    /// Report whether `visit` is close enough to `attraction` to earn a
    /// reward.
    #[must_use]
    pub fn is_near_for_reward(&self, visit: &VisitedLocation, attraction: &Attraction) -> bool {
        distance_miles(attraction.location, visit.location) <= self.proximity_buffer()
    }
}
