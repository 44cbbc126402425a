//! Geohash cells.
//!
//! Encoding, decoding and neighbor stepping come from the `geohash` crate.
//! This module wraps its `String` results in a fixed-size `Copy` cell and
//! checks precision once, up front. Adjacent cells are found by stepping
//! from the cell center, never by comparing prefixes.

use std::fmt;

use geohash::Coord;
use serde::{Serialize, Serializer};

use super::coordinate::Coordinate;

/// Longest geohash we store. Twelve characters is sub-centimetre.
const MAX_PRECISION: u8 = 12;

/// Errors from geohash parsing, encoding or precision validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeohashError {
    #[error("geohash precision must be between 1 and {MAX_PRECISION}, got {0}")]
    InvalidPrecision(usize),

    #[error("invalid geohash character {0:?}")]
    InvalidCharacter(char),

    #[error("geohash encoding failed: {0}")]
    Encoding(String),
}

impl From<geohash::GeohashError> for GeohashError {
    fn from(e: geohash::GeohashError) -> Self {
        match e {
            geohash::GeohashError::InvalidHashCharacter(c) => GeohashError::InvalidCharacter(c),
            geohash::GeohashError::InvalidLength(len) => GeohashError::InvalidPrecision(len),
            other => GeohashError::Encoding(other.to_string()),
        }
    }
}

/// Number of characters in a geohash.
///
/// Cell size shrinks roughly 32× per character. Six characters (about
/// 1.2 km × 0.6 km) is the system default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Precision(u8);

impl Precision {
    pub const DEFAULT: Precision = Precision(6);

    /// Validate a precision in `1..=12`.
    pub fn new(chars: usize) -> Result<Self, GeohashError> {
        if chars == 0 || chars > MAX_PRECISION as usize {
            return Err(GeohashError::InvalidPrecision(chars));
        }
        Ok(Precision(chars as u8))
    }

    pub fn chars(self) -> usize {
        self.0 as usize
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The latitude/longitude box a geohash covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeohashBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeohashBounds {
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat())
            && (self.min_lon..=self.max_lon).contains(&coord.lon())
    }
}

/// A geohash string of 1 to 12 base-32 characters.
///
/// Stored inline so cells are `Copy` and cheap to compare; every LED
/// carries nine of them.
///
/// # Examples
///
/// ```
/// use train_leds::geo::{Coordinate, Geohash, Precision};
///
/// let palatine = Coordinate::new(42.113, -88.049).unwrap();
/// let cell = Geohash::encode(&palatine, Precision::DEFAULT).unwrap();
/// assert_eq!(cell.as_str(), "dp3rs6");
///
/// assert!(Geohash::parse("dp3rs6").is_ok());
/// assert!(Geohash::parse("dp3rsa").is_err()); // 'a' is not base-32
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geohash {
    bytes: [u8; MAX_PRECISION as usize],
    len: u8,
}

impl Geohash {
    /// Encode a coordinate at the given precision.
    pub fn encode(coord: &Coordinate, precision: Precision) -> Result<Self, GeohashError> {
        let point = Coord {
            x: coord.lon(),
            y: coord.lat(),
        };
        let code = geohash::encode(point, precision.chars())?;
        Self::from_code(&code)
    }

    /// Parse a geohash string. Uppercase input is accepted and normalized.
    pub fn parse(s: &str) -> Result<Self, GeohashError> {
        Precision::new(s.len())?;
        let lower = s.to_ascii_lowercase();
        // Rejects anything outside the base-32 alphabet.
        geohash::decode_bbox(&lower)?;
        Self::from_code(&lower)
    }

    /// Copy an already validated code into an inline cell.
    fn from_code(code: &str) -> Result<Self, GeohashError> {
        let precision = Precision::new(code.len())?;
        let mut bytes = [0u8; MAX_PRECISION as usize];
        bytes[..code.len()].copy_from_slice(code.as_bytes());
        Ok(Self {
            bytes,
            len: precision.0,
        })
    }

    pub fn precision(&self) -> Precision {
        Precision(self.len)
    }

    pub fn as_str(&self) -> &str {
        // Only base-32 ASCII is ever stored, so this is always valid UTF-8.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }

    /// The box this cell covers.
    pub fn bounds(&self) -> Result<GeohashBounds, GeohashError> {
        let rect = geohash::decode_bbox(self.as_str())?;
        Ok(GeohashBounds {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lon: rect.min().x,
            max_lon: rect.max().x,
        })
    }

    /// All eight neighbors, clockwise from north.
    ///
    /// Wraps across the antimeridian and over the poles, so every cell has
    /// exactly eight distinct neighbors.
    pub fn neighbors(&self) -> Result<[Geohash; 8], GeohashError> {
        let n = geohash::neighbors(self.as_str())?;
        Ok([
            Self::from_code(&n.n)?,
            Self::from_code(&n.ne)?,
            Self::from_code(&n.e)?,
            Self::from_code(&n.se)?,
            Self::from_code(&n.s)?,
            Self::from_code(&n.sw)?,
            Self::from_code(&n.w)?,
            Self::from_code(&n.nw)?,
        ])
    }
}

impl fmt::Debug for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Geohash({})", self.as_str())
    }
}

impl fmt::Display for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Geohash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn gh(s: &str) -> Geohash {
        Geohash::parse(s).unwrap()
    }

    #[test]
    fn encode_known_values() {
        let p11 = Precision::new(11).unwrap();
        assert_eq!(
            Geohash::encode(&coord(57.64911, 10.40744), p11).unwrap().as_str(),
            "u4pruydqqvj"
        );
        assert_eq!(
            Geohash::encode(&coord(42.113, -88.049), Precision::DEFAULT).unwrap().as_str(),
            "dp3rs6"
        );
        assert_eq!(
            Geohash::encode(&coord(0.0, 0.0), Precision::new(1).unwrap()).unwrap().as_str(),
            "s"
        );
    }

    #[test]
    fn encode_respects_precision() {
        let c = coord(41.8825, -87.6404);
        for n in 1..=12 {
            let cell = Geohash::encode(&c, Precision::new(n).unwrap()).unwrap();
            assert_eq!(cell.as_str().len(), n);
            assert_eq!(cell.precision().chars(), n);
        }
    }

    #[test]
    fn longer_hash_extends_shorter() {
        let c = coord(42.113, -88.049);
        let short = Geohash::encode(&c, Precision::new(4).unwrap()).unwrap();
        let long = Geohash::encode(&c, Precision::new(9).unwrap()).unwrap();
        assert!(long.as_str().starts_with(short.as_str()));
    }

    #[test]
    fn bounds_contain_encoded_point() {
        let c = coord(42.113, -88.049);
        let cell = Geohash::encode(&c, Precision::DEFAULT).unwrap();
        assert!(cell.bounds().unwrap().contains(&c));
    }

    #[test]
    fn neighbors_of_palatine_cell() {
        let n = gh("dp3rs6").neighbors().unwrap();
        let strs: Vec<&str> = n.iter().map(|g| g.as_str()).collect();
        assert_eq!(
            strs,
            vec![
                "dp3rs7", "dp3rse", "dp3rsd", "dp3rs9", "dp3rs3", "dp3rs1", "dp3rs4", "dp3rs5"
            ]
        );
    }

    #[test]
    fn opposite_neighbors_lead_back() {
        let cell = gh("dp3rs6");
        let n = cell.neighbors().unwrap();
        // N and S, NE and SW, E and W are four apart clockwise.
        for i in 0..4 {
            assert_eq!(n[i].neighbors().unwrap()[i + 4], cell);
        }
    }

    #[test]
    fn neighbors_wrap_at_edges() {
        let strs: Vec<String> = gh("b").neighbors().unwrap().iter().map(|g| g.to_string()).collect();
        assert_eq!(strs, vec!["0", "1", "c", "9", "8", "x", "z", "p"]);
    }

    #[test]
    fn parse_normalizes_case() {
        assert_eq!(gh("DP3RS6").as_str(), "dp3rs6");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            Geohash::parse(""),
            Err(GeohashError::InvalidPrecision(0))
        );
        assert_eq!(
            Geohash::parse("0123456789bcd"),
            Err(GeohashError::InvalidPrecision(13))
        );
        assert_eq!(
            Geohash::parse("dp3rsa"),
            Err(GeohashError::InvalidCharacter('a'))
        );
        assert!(Geohash::parse("dp3-s6").is_err());
        assert!(Geohash::parse("dp3rsé").is_err());
    }

    #[test]
    fn crate_errors_map_onto_ours() {
        assert_eq!(
            GeohashError::from(geohash::GeohashError::InvalidLength(13)),
            GeohashError::InvalidPrecision(13)
        );
        assert_eq!(
            GeohashError::from(geohash::GeohashError::InvalidHashCharacter('a')),
            GeohashError::InvalidCharacter('a')
        );
        let out_of_range = geohash::GeohashError::InvalidCoordinateRange(Coord { x: 200.0, y: 0.0 });
        assert!(matches!(
            GeohashError::from(out_of_range),
            GeohashError::Encoding(_)
        ));
    }

    #[test]
    fn precision_bounds() {
        assert!(Precision::new(0).is_err());
        assert!(Precision::new(13).is_err());
        assert_eq!(Precision::new(12).unwrap().chars(), 12);
        assert_eq!(Precision::default(), Precision::DEFAULT);
    }

    #[test]
    fn display_and_debug() {
        let cell = gh("dp3rs6");
        assert_eq!(cell.to_string(), "dp3rs6");
        assert_eq!(format!("{:?}", cell), "Geohash(dp3rs6)");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&gh("dp3rs6")).unwrap();
        assert_eq!(json, "\"dp3rs6\"");
    }
}
