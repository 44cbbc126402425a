//! Great-circle distance.

use super::coordinate::Coordinate;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two lat/lon points, in metres.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// A way of measuring how far apart two coordinates are.
///
/// The matcher only needs an ordering between candidate LEDs, so any
/// monotone distance works. Production uses [`Haversine`].
pub trait DistanceMetric {
    /// Distance between `a` and `b`. Smaller means closer.
    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64;
}

/// Great-circle distance on a spherical Earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        haversine_distance(a.lat(), a.lon(), b.lat(), b.lon())
    }
}

impl<M: DistanceMetric + ?Sized> DistanceMetric for &M {
    fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        (**self).distance(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn zero_for_same_point() {
        let p = coord(42.113, -88.049);
        assert_eq!(Haversine.distance(&p, &p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        // 2πR / 360
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn ogilvie_to_palatine() {
        let ogilvie = coord(41.8825, -87.6404);
        let palatine = coord(42.113, -88.049);
        let d = Haversine.distance(&ogilvie, &palatine);
        // Roughly 42 km as the crow flies.
        assert!((40_000.0..45_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = coord(42.113, -88.049);
        let b = coord(42.4196, -88.6136);
        let d = Haversine.distance(&a, &b) - Haversine.distance(&b, &a);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn metric_by_reference() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);
        let metric = &Haversine;
        assert_eq!(metric.distance(&a, &b), Haversine.distance(&a, &b));
    }
}
