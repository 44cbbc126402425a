//! Matching errors.
//!
//! "No LED near this train" is not an error: it is `Ok(None)`. These
//! variants are configuration or programming defects that must stay
//! distinguishable from it.

use crate::domain::{LedSlot, LineName};
use crate::geo::GeohashError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("line {0} is not in the LED index")]
    UnknownLine(LineName),

    #[error("observation geohash precision {found} does not match index precision {expected}")]
    PrecisionMismatch { expected: usize, found: usize },

    #[error("{line} has no spur {spur}")]
    SpurOutOfRange { line: LineName, spur: usize },

    #[error("{line} spur {spur} has no segment {segment}")]
    SegmentOutOfRange {
        line: LineName,
        spur: usize,
        segment: usize,
    },

    #[error("{line} has no LED at {slot}")]
    LedOutOfRange { line: LineName, slot: LedSlot },

    #[error("failed to hash position: {0}")]
    Geohash(#[from] GeohashError),
}
