//! Core domain types for the Waymark reward engine.
//!
//! The crate models the geographic side of reward attribution: coordinates,
//! attractions, timestamped visits, and the per-user reward ledger. It also
//! defines the collaborator boundaries the engine consumes:
//!
//! - [`AttractionCatalog`] supplies the immutable attraction list.
//! - [`RewardPointOracle`] authoritatively prices an (attraction, user) pair.
//! - [`User`] carries the append-only visit history the engine snapshots.
//!
//! Distances are great-circle distances in statute miles
//! ([`distance::distance_miles`]); [`ProximityClassifier`] turns them into
//! reward-eligibility and discovery decisions.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attraction;
mod catalog;
mod coordinate;
pub mod distance;
mod ids;
mod ledger;
mod oracle;
pub mod proximity;
mod user;
mod visit;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use attraction::Attraction;
pub use catalog::{AttractionCatalog, CatalogError};
pub use coordinate::{Coordinate, CoordinateError};
pub use distance::distance_miles;
pub use ids::{AttractionId, UserId};
pub use ledger::{RewardLedger, RewardRecord};
pub use oracle::{OracleError, RewardPointOracle};
pub use proximity::{ProximityClassifier, ThresholdError};
pub use user::User;
pub use visit::{VisitedLocation, VisitedLocationLog};
