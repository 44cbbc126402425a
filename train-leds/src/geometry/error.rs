//! Geometry load errors.

use std::path::PathBuf;

use crate::domain::LineName;
use crate::geo::{GeohashError, InvalidCoordinate};

/// Errors while reading survey files or building the LED index.
///
/// Every variant is fatal for the line it names: a line with corrupt
/// geometry is never served.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {column} is not a number ({value:?})")]
    MalformedField {
        row: u64,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: waypoint {index} appears before any spur start (index 0)")]
    OrphanWaypoint { row: u64, index: usize },

    #[error("row {row}: expected waypoint {expected}, found {found}")]
    WaypointOutOfOrder {
        row: u64,
        expected: usize,
        found: usize,
    },

    #[error("{line} spur {spur} waypoint {waypoint}: missing {field}")]
    MissingField {
        line: LineName,
        spur: usize,
        waypoint: usize,
        field: &'static str,
    },

    #[error("{line} spur {spur} waypoint {waypoint}: {source}")]
    InvalidWaypointCoordinate {
        line: LineName,
        spur: usize,
        waypoint: usize,
        #[source]
        source: InvalidCoordinate,
    },

    #[error("{line} spur {spur} segment {segment} LED {led}: {source}")]
    InvalidLedCoordinate {
        line: LineName,
        spur: usize,
        segment: usize,
        led: usize,
        #[source]
        source: InvalidCoordinate,
    },

    #[error("{line} spur {spur} has no LEDs")]
    EmptySpur { line: LineName, spur: usize },

    #[error("{0} has no spurs")]
    EmptyLine(LineName),

    #[error("line {0} is defined more than once")]
    DuplicateLine(LineName),

    #[error("{line}: LED geohash precision {found} does not match index precision {expected}")]
    PrecisionMismatch {
        line: LineName,
        expected: usize,
        found: usize,
    },

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<GeometryError>,
    },

    #[error("failed to hash LED position: {0}")]
    Geohash(#[from] GeohashError),
}
