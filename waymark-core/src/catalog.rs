//! Attraction catalog boundary.

use thiserror::Error;

use crate::Attraction;

/// Errors from [`AttractionCatalog::list_attractions`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The backing source could not be reached or read.
    #[error("attraction catalog is unavailable: {message}")]
    Unavailable {
        /// Description of the underlying failure.
        message: String,
    },
    /// The source returned data that could not be interpreted.
    #[error("attraction catalog is malformed: {message}")]
    Malformed {
        /// Description of the rejected payload.
        message: String,
    },
}

/// Supply the fixed list of attractions known to the system.
///
/// The engine calls this once at construction and shares the result
/// read-only for its lifetime, so implementations may be slow.
///
/// # Examples
///
/// ```rust
/// use waymark_core::{Attraction, AttractionCatalog, AttractionId, CatalogError, Coordinate};
///
/// struct SingleAttraction(Attraction);
///
/// impl AttractionCatalog for SingleAttraction {
///     fn list_attractions(&self) -> Result<Vec<Attraction>, CatalogError> {
///         Ok(vec![self.0.clone()])
///     }
/// }
///
/// let catalog = SingleAttraction(Attraction::new(
///     AttractionId::random(),
///     "Pier",
///     Coordinate::new(0.0, 0.0),
/// ));
/// assert_eq!(catalog.list_attractions()?.len(), 1);
/// # Ok::<(), CatalogError>(())
/// ```
pub trait AttractionCatalog {
    /// Return every attraction in catalog order.
    fn list_attractions(&self) -> Result<Vec<Attraction>, CatalogError>;
}
