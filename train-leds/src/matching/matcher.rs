//! Nearest-LED search.
//!
//! The index is sparse and hand-surveyed, so a full nearest-neighbor
//! structure is not worth it. Instead:
//!
//! 1. every LED whose nine-box (own cell + 8 neighbors) contains the
//!    train's cell is a candidate;
//! 2. if exactly one candidate sits in the train's own cell, it wins
//!    without measuring anything;
//! 3. otherwise the candidate physically closest to the train wins, with
//!    ties going to the first LED in spur → segment → LED order.

use std::sync::Arc;

use tracing::trace;

use crate::domain::{LedPoint, LedSlot, Line, LineName, TrainObservation};
use crate::geo::{Coordinate, DistanceMetric, Geohash, Haversine};
use crate::geometry::GeoIndex;

use super::error::MatchError;

/// Finds the LED slot that best represents a live position.
///
/// Pure with respect to its inputs: the index is immutable and no state is
/// kept between calls, so one matcher can serve every line and cycle.
#[derive(Debug, Clone)]
pub struct NearestLedMatcher<M = Haversine> {
    index: Arc<GeoIndex>,
    metric: M,
}

impl NearestLedMatcher<Haversine> {
    /// Matcher using great-circle distance.
    pub fn new(index: Arc<GeoIndex>) -> Self {
        Self::with_metric(index, Haversine)
    }
}

impl<M: DistanceMetric> NearestLedMatcher<M> {
    pub fn with_metric(index: Arc<GeoIndex>, metric: M) -> Self {
        Self { index, metric }
    }

    pub fn index(&self) -> &Arc<GeoIndex> {
        &self.index
    }

    /// Match one train on one line.
    pub fn match_observation(
        &self,
        line: &LineName,
        observation: &TrainObservation,
    ) -> Result<Option<LedSlot>, MatchError> {
        self.match_position(line, observation.position(), observation.geohash())
    }

    /// Match a position whose cell has already been computed.
    ///
    /// Returns `Ok(None)` when no LED's nine-box contains `cell`: the train
    /// is between or outside the tracked LED zones.
    pub fn match_position(
        &self,
        line: &LineName,
        position: &Coordinate,
        cell: &Geohash,
    ) -> Result<Option<LedSlot>, MatchError> {
        let geometry = self
            .index
            .line(line)
            .ok_or_else(|| MatchError::UnknownLine(line.clone()))?;

        if cell.precision() != self.index.precision() {
            return Err(MatchError::PrecisionMismatch {
                expected: self.index.precision().chars(),
                found: cell.precision().chars(),
            });
        }

        Ok(self.nearest(geometry, position, cell))
    }

    fn nearest(&self, line: &Line, position: &Coordinate, cell: &Geohash) -> Option<LedSlot> {
        let candidates: Vec<(LedSlot, &LedPoint)> =
            line.leds().filter(|(_, led)| led.in_nine_box(cell)).collect();

        if candidates.is_empty() {
            trace!(line = %line.name(), %cell, "no LED near position");
            return None;
        }

        let mut exact = candidates.iter().filter(|(_, led)| led.geohash() == cell);
        if let (Some((slot, _)), None) = (exact.next(), exact.next()) {
            trace!(line = %line.name(), %cell, %slot, "single exact cell match");
            return Some(*slot);
        }

        // Zero or several LEDs share the train's cell: measure every
        // candidate, not just the exact ones.
        let mut best: Option<(LedSlot, f64)> = None;
        for (slot, led) in &candidates {
            let distance = self.metric.distance(position, led.coordinate());
            match best {
                Some((_, closest)) if distance >= closest => {}
                _ => best = Some((*slot, distance)),
            }
        }

        if let Some((slot, distance)) = best {
            trace!(
                line = %line.name(),
                %cell,
                %slot,
                candidates = candidates.len(),
                distance_m = distance,
                "nearest candidate by distance"
            );
        }

        best.map(|(slot, _)| slot)
    }
}
