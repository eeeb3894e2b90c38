use crate::{AttractionId, Coordinate};

/// A named point of interest that can earn users reward points.
///
/// # Examples
/// ```
/// use waymark_core::{Attraction, AttractionId, Coordinate};
///
/// let attraction = Attraction::new(
///     AttractionId::random(),
///     "Disneyland",
///     Coordinate::new(33.817_595, -117.922_008),
/// );
/// assert_eq!(attraction.name, "Disneyland");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attraction {
    /// Unique identifier.
    pub id: AttractionId,
    /// Display name.
    pub name: String,
    /// Fixed position of the attraction.
    pub location: Coordinate,
}

impl Attraction {
    /// Construct an `Attraction`.
    pub fn new(id: AttractionId, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }
}
