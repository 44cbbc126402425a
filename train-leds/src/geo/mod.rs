//! Geospatial primitives shared by the index builder and the matcher.
//!
//! Geohash cells at a fixed precision bucket LED positions; the haversine
//! distance settles ties between LEDs that land in the same neighborhood.

mod coordinate;
mod distance;
mod geohash;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use distance::{DistanceMetric, EARTH_RADIUS_M, Haversine, haversine_distance};
pub use self::geohash::{Geohash, GeohashBounds, GeohashError, Precision};
