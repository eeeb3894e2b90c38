use geo::{Coord, Point};
use thiserror::Error;

/// A WGS84 position expressed as latitude and longitude in degrees.
///
/// Conversions to and from [`geo`] types map `x = longitude` and
/// `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::Coordinate;
///
/// let eiffel = Coordinate::new(48.8584, 2.2945);
/// let coord: Coord<f64> = eiffel.into();
/// assert_eq!(coord.x, 2.2945);
/// assert_eq!(coord.y, 48.8584);
/// ```
///
/// Deserialization goes through [`Coordinate::try_new`], so out-of-range
/// degrees in JSON input are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    /// Degrees north of the equator, `-90.0..=90.0`.
    pub latitude: f64,
    /// Degrees east of the prime meridian, `-180.0..=180.0`.
    pub longitude: f64,
}

/// Unvalidated wire form of a [`Coordinate`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::try_new(raw.latitude, raw.longitude)
    }
}

/// Errors returned by [`Coordinate::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was non-finite or outside `-90.0..=90.0`.
    #[error("latitude {0} is outside -90..=90 degrees")]
    Latitude(f64),
    /// Longitude was non-finite or outside `-180.0..=180.0`.
    #[error("longitude {0} is outside -180..=180 degrees")]
    Longitude(f64),
}

impl Coordinate {
    /// Construct a coordinate without range checks.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate the degree ranges and construct a coordinate.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] when either component is non-finite or
    /// out of range.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Self::new(value.y, value.x)
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Self::new(value.longitude, value.latitude)
    }
}
