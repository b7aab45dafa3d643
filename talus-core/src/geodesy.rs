//! Great-circle helpers for WGS84 coordinates.
//!
//! Coordinates follow the `geo` convention used across the workspace:
//! `x = longitude`, `y = latitude`, both in degrees.

use geo::{Bearing, Coord, Distance, Haversine, Point};

const METRES_PER_KILOMETRE: f64 = 1_000.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use talus_core::geodesy::great_circle_distance_km;
///
/// let boulder = Coord { x: -105.27, y: 40.01 };
/// assert_eq!(great_circle_distance_km(boulder, boulder), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "converting metres to kilometres is a single division"
)]
pub fn great_circle_distance_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to)) / METRES_PER_KILOMETRE
}

/// Initial bearing from `from` towards `to`, in degrees clockwise from north.
#[must_use]
pub fn initial_bearing_deg(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.bearing(Point::from(from), Point::from(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tests compare distances")]
    fn one_hundredth_degree_of_latitude_is_about_a_kilometre() {
        let a = Coord { x: -105.0, y: 40.0 };
        let b = Coord { x: -105.0, y: 40.01 };
        let distance = great_circle_distance_km(a, b);
        assert!((distance - 1.112).abs() < 0.01, "got {distance}");
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = Coord { x: 7.65, y: 45.98 };
        let b = Coord { x: 6.86, y: 45.83 };
        assert_eq!(
            great_circle_distance_km(a, b).to_bits(),
            great_circle_distance_km(b, a).to_bits()
        );
    }

    #[rstest]
    #[case(Coord { x: 0.0, y: 1.0 }, 0.0)]
    #[case(Coord { x: 1.0, y: 0.0 }, 90.0)]
    #[case(Coord { x: 0.0, y: -1.0 }, 180.0)]
    #[expect(clippy::float_arithmetic, reason = "tests compare bearings")]
    fn bearing_points_along_cardinal_axes(#[case] to: Coord<f64>, #[case] expected: f64) {
        let origin = Coord { x: 0.0, y: 0.0 };
        let bearing = initial_bearing_deg(origin, to);
        assert!((bearing - expected).abs() < 1e-6, "got {bearing}");
    }
}
