//! Validated WGS84 coordinates.

use std::fmt;

use serde::Serialize;

/// Error returned when a latitude/longitude pair is not a usable coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    pub lat: f64,
    pub lon: f64,
    reason: &'static str,
}

/// A latitude/longitude pair in degrees.
///
/// Both components are finite and in range, so geohash encoding and
/// distance computations never see `NaN` geometry.
///
/// # Examples
///
/// ```
/// use train_leds::geo::Coordinate;
///
/// let palatine = Coordinate::new(42.113, -88.049).unwrap();
/// assert_eq!(palatine.lat(), 42.113);
///
/// assert!(Coordinate::new(f64::NAN, 0.0).is_err());
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "components must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "latitude must be within [-90, 90]",
            });
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                lat,
                lon,
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

    /// Shift by a (Δlon, Δlat) pair, re-validating the result.
    ///
    /// Survey deltas are given longitude first, matching the column order
    /// of the geometry files.
    pub fn offset(&self, dlon: f64, dlat: f64) -> Result<Self, InvalidCoordinate> {
        Self::new(self.lat + dlat, self.lon + dlon)
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}
