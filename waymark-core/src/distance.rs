//! Great-circle distance between coordinates.
//!
//! Distances use the spherical law of cosines with one nautical mile per arc
//! minute, then convert to statute miles. Every threshold in the engine is
//! expressed in statute miles, so callers must not mix in kilometres.

use crate::Coordinate;

/// Conversion factor from nautical to statute miles.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// Nautical miles subtended by one degree of arc.
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Return the great-circle distance between `a` and `b` in statute miles.
///
/// The cosine of the central angle is clamped to `[-1, 1]` before `acos`,
/// so rounding never produces `NaN`, and identical coordinates always yield
/// exactly `0.0`.
///
/// # Examples
/// ```
/// use waymark_core::{Coordinate, distance_miles};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let one_degree_north = Coordinate::new(1.0, 0.0);
///
/// let miles = distance_miles(origin, one_degree_north);
/// assert!((miles - 69.046_767).abs() < 1e-3);
/// assert_eq!(distance_miles(origin, origin), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "spherical trigonometry is inherently floating point"
)]
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let cosine = lat1
        .sin()
        .mul_add(lat2.sin(), lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0);
    let angle = cosine.acos();

    let nautical_miles = NAUTICAL_MILES_PER_DEGREE * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}
