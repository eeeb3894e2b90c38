//! Error types for engine construction and attribution.

use thiserror::Error;
use waymark_core::{CatalogError, OracleError, ThresholdError};

/// Errors returned by [`RewardAttributionEngine::new`](crate::RewardAttributionEngine::new).
#[derive(Debug, Error)]
pub enum EngineBuildError {
    /// The attraction catalog could not be read.
    #[error("failed to load the attraction catalog")]
    Catalog(#[source] CatalogError),
    /// The catalog answered with no attractions.
    #[error("the attraction catalog is empty")]
    EmptyCatalog,
    /// The worker pool was configured with no slots.
    #[error("worker capacity must be at least one")]
    ZeroWorkerCapacity,
    /// A configured proximity radius was negative or non-finite.
    #[error("invalid proximity threshold")]
    Threshold(#[from] ThresholdError),
}

/// Errors surfaced by an [`AttributionHandle`](crate::AttributionHandle).
#[derive(Debug, Error)]
pub enum AttributionError {
    /// The coordinating task panicked or was cancelled by runtime shutdown.
    #[error("attribution task did not complete")]
    Join(#[from] tokio::task::JoinError),
}

/// Why a single (visited location, attraction) pair could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairFailureKind {
    /// The points oracle failed for a matching pair.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// The pair task panicked.
    #[error("pair evaluation panicked")]
    Panicked,
    /// The pair task never ran to completion.
    #[error("pair evaluation was cancelled")]
    Cancelled,
}
