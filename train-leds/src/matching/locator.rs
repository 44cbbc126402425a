//! Match-then-resolve for a single train.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{LedSlot, LineName, TrainObservation};
use crate::geo::{Coordinate, DistanceMetric, Geohash, Haversine};
use crate::geometry::GeoIndex;

use super::error::MatchError;
use super::matcher::NearestLedMatcher;
use super::resolver::SpurPositionResolver;

/// Where a train was placed on a line's LED strands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub spur: usize,
    pub segment: usize,
    /// LED index within the segment.
    pub led: usize,
    /// 1-based position along the whole spur.
    pub position: usize,
}

impl MatchResult {
    pub fn slot(&self) -> LedSlot {
        LedSlot::new(self.spur, self.segment, self.led)
    }
}

/// Runs the matcher and resolver against one shared index.
#[derive(Debug, Clone)]
pub struct TrainLocator<M = Haversine> {
    matcher: NearestLedMatcher<M>,
    resolver: SpurPositionResolver,
}

impl TrainLocator<Haversine> {
    pub fn new(index: Arc<GeoIndex>) -> Self {
        Self {
            matcher: NearestLedMatcher::new(index.clone()),
            resolver: SpurPositionResolver::new(index),
        }
    }
}

impl<M: DistanceMetric> TrainLocator<M> {
    pub fn index(&self) -> &GeoIndex {
        self.matcher.index()
    }

    pub fn resolver(&self) -> &SpurPositionResolver {
        &self.resolver
    }

    /// Place one train, or `Ok(None)` when no LED is near it.
    pub fn locate(
        &self,
        line: &LineName,
        observation: &TrainObservation,
    ) -> Result<Option<MatchResult>, MatchError> {
        let Some(slot) = self.matcher.match_observation(line, observation)? else {
            return Ok(None);
        };
        self.resolve(line, slot).map(Some)
    }

    /// Place a fixed coordinate, hashing it at the index precision.
    pub fn locate_coordinate(
        &self,
        line: &LineName,
        position: &Coordinate,
    ) -> Result<Option<MatchResult>, MatchError> {
        let cell = Geohash::encode(position, self.index().precision())?;
        let Some(slot) = self.matcher.match_position(line, position, &cell)? else {
            return Ok(None);
        };
        self.resolve(line, slot).map(Some)
    }

    fn resolve(&self, line: &LineName, slot: LedSlot) -> Result<MatchResult, MatchError> {
        let position = self.resolver.absolute_position(line, slot)?;
        Ok(MatchResult {
            spur: slot.spur,
            segment: slot.segment,
            led: slot.led,
            position,
        })
    }
}
