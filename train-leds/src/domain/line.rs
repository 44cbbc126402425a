//! Line geometry: lines, spurs, segments and LED points.

use std::fmt;

use serde::Serialize;

use crate::geo::{Coordinate, Geohash, GeohashError, Precision};

/// Error returned when parsing an invalid line name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line name {name:?}: {reason}")]
pub struct InvalidLineName {
    name: String,
    reason: &'static str,
}

/// The route identifier of a rail line, as used by the positions feed.
///
/// Names are ASCII letters, digits, `-` and `_` (e.g. `UP-NW`, `MD-W`,
/// `BNSF`). Surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use train_leds::domain::LineName;
///
/// let upnw = LineName::parse(" UP-NW ").unwrap();
/// assert_eq!(upnw.as_str(), "UP-NW");
///
/// assert!(LineName::parse("").is_err());
/// assert!(LineName::parse("UP NW").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineName(String);

impl LineName {
    pub fn parse(s: &str) -> Result<Self, InvalidLineName> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidLineName {
                name: s.to_string(),
                reason: "must not be empty",
            });
        }

        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(InvalidLineName {
                name: s.to_string(),
                reason: "only ASCII letters, digits, '-' and '_' are allowed",
            });
        }

        Ok(LineName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineName({})", self.0)
    }
}

impl fmt::Display for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One LED on the physical map, with its geohash nine-box.
///
/// The geohash and its eight neighbors are computed once, when the point is
/// built, and never change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedPoint {
    coordinate: Coordinate,
    geohash: Geohash,
    neighbors: [Geohash; 8],
}

impl LedPoint {
    /// Build a point at `coordinate`, hashing it at `precision`.
    pub fn new(coordinate: Coordinate, precision: Precision) -> Result<Self, GeohashError> {
        let geohash = Geohash::encode(&coordinate, precision)?;
        Ok(Self {
            coordinate,
            geohash,
            neighbors: geohash.neighbors()?,
        })
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn geohash(&self) -> &Geohash {
        &self.geohash
    }

    /// The eight surrounding cells, clockwise from north.
    pub fn neighbors(&self) -> &[Geohash; 8] {
        &self.neighbors
    }

    /// Is `cell` this point's own cell or one of its eight neighbors?
    pub fn in_nine_box(&self, cell: &Geohash) -> bool {
        self.geohash == *cell || self.neighbors.contains(cell)
    }
}

/// LEDs between one pair of consecutive survey waypoints.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    index: usize,
    survey_id: Option<u32>,
    leds: Vec<LedPoint>,
}

impl Segment {
    pub fn new(index: usize, survey_id: Option<u32>, leds: Vec<LedPoint>) -> Self {
        Self {
            index,
            survey_id,
            leds,
        }
    }

    /// Position of this segment within its spur.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Segment identifier from the survey spreadsheet, if it had one.
    pub fn survey_id(&self) -> Option<u32> {
        self.survey_id
    }

    pub fn leds(&self) -> &[LedPoint] {
        &self.leds
    }

    pub fn led_count(&self) -> usize {
        self.leds.len()
    }
}

/// One physical branch of a line, mapped to one contiguous LED strand.
#[derive(Debug, Clone, Serialize)]
pub struct Spur {
    segments: Vec<Segment>,
}

impl Spur {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total LEDs on the strand.
    pub fn led_count(&self) -> usize {
        self.segments.iter().map(Segment::led_count).sum()
    }
}

/// A rail line: its name and its spurs, main line first.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    name: LineName,
    spurs: Vec<Spur>,
}

impl Line {
    pub fn new(name: LineName, spurs: Vec<Spur>) -> Self {
        Self { name, spurs }
    }

    pub fn name(&self) -> &LineName {
        &self.name
    }

    pub fn spurs(&self) -> &[Spur] {
        &self.spurs
    }

    pub fn led_count(&self) -> usize {
        self.spurs.iter().map(Spur::led_count).sum()
    }

    /// Look up an LED by slot.
    pub fn led(&self, slot: LedSlot) -> Option<&LedPoint> {
        self.spurs
            .get(slot.spur)?
            .segments
            .get(slot.segment)?
            .leds
            .get(slot.led)
    }

    /// Every LED with its slot, in spur → segment → LED order.
    pub fn leds(&self) -> impl Iterator<Item = (LedSlot, &LedPoint)> + '_ {
        self.spurs.iter().enumerate().flat_map(|(spur, s)| {
            s.segments.iter().enumerate().flat_map(move |(segment, seg)| {
                seg.leds.iter().enumerate().map(move |(led, point)| {
                    (
                        LedSlot {
                            spur,
                            segment,
                            led,
                        },
                        point,
                    )
                })
            })
        })
    }
}

/// Address of one LED: spur, segment within the spur, LED within the segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LedSlot {
    pub spur: usize,
    pub segment: usize,
    pub led: usize,
}

impl LedSlot {
    pub fn new(spur: usize, segment: usize, led: usize) -> Self {
        Self { spur, segment, led }
    }
}

impl fmt::Display for LedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.spur, self.segment, self.led)
    }
}
