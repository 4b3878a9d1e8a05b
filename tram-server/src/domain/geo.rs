//! Geographic coordinate type and great-circle distance.

use std::fmt;

/// Mean Earth radius in meters, used by the Haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when constructing an invalid coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

impl InvalidCoordinate {
    /// The reason the coordinate was rejected.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A WGS-84 coordinate in floating-point degrees.
///
/// Equality is exact floating-point equality on both components. The
/// stationarity check relies on this: a tram is "still" only when it reports
/// the identical coordinate again.
#[derive(Clone, Copy, PartialEq)]
pub struct LatLon {
    lat: f64,
    lon: f64,
}

impl LatLon {
    /// Construct a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                reason: "coordinate must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in meters (Haversine, spherical Earth).
    pub fn distance_m(&self, other: &LatLon) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl fmt::Debug for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLon({}, {})", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> LatLon {
        LatLon::new(lat, lon).unwrap()
    }

    #[test]
    fn reject_non_finite() {
        assert!(LatLon::new(f64::NAN, 0.0).is_err());
        assert!(LatLon::new(0.0, f64::INFINITY).is_err());
        assert!(LatLon::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(LatLon::new(90.1, 0.0).is_err());
        assert!(LatLon::new(-90.1, 0.0).is_err());
        assert!(LatLon::new(0.0, 180.1).is_err());
        assert!(LatLon::new(0.0, -180.1).is_err());
    }

    #[test]
    fn accept_boundaries() {
        assert!(LatLon::new(90.0, 180.0).is_ok());
        assert!(LatLon::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = coord(43.8563, 18.4131);
        assert_eq!(p.distance_m(&p), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);
        // One degree of arc on a 6371 km sphere is about 111.19 km.
        let d = a.distance_m(&b);
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn short_urban_distance() {
        // Two points ~100m apart in Sarajevo.
        let a = coord(43.8563, 18.4131);
        let b = coord(43.8563, 18.4144);
        let d = a.distance_m(&b);
        assert!((50.0..200.0).contains(&d), "got {d}");
    }

    #[test]
    fn exact_equality_on_components() {
        let a = coord(43.8563, 18.4131);
        let b = coord(43.8563, 18.4131);
        let c = coord(43.8563, 18.41310000001);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_coord() -> impl Strategy<Value = LatLon> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_map(|(lat, lon)| LatLon::new(lat, lon).unwrap())
    }

    proptest! {
        /// Distance is symmetric.
        #[test]
        fn symmetric(a in any_coord(), b in any_coord()) {
            let ab = a.distance_m(&b);
            let ba = b.distance_m(&a);
            prop_assert!((ab - ba).abs() < 1e-6, "{ab} vs {ba}");
        }

        /// Distance is never negative and never exceeds half the circumference.
        #[test]
        fn bounded(a in any_coord(), b in any_coord()) {
            let d = a.distance_m(&b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1.0);
        }

        /// A coordinate is at distance zero from itself.
        #[test]
        fn identity(a in any_coord()) {
            prop_assert_eq!(a.distance_m(&a), 0.0);
        }
    }
}
