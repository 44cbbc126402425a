//! Turns survey waypoints into LED geometry.
//!
//! LED positions are not interpolated geometrically. The survey already
//! gives, for each waypoint pair, how many LEDs sit between them and the
//! lat/lon step from one to the next:
//!
//! ```text
//! led[0] = previous waypoint + offset delta
//! led[k] = led[k-1]          + LED delta
//! ```
//!
//! The accumulation is order-dependent, so a missing count or delta fails
//! the whole line instead of producing `NaN` points.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{LedPoint, Line, LineName, Segment, Spur};
use crate::geo::{Coordinate, Precision};

use super::error::GeometryError;
use super::index::GeoIndex;
use super::record::{WaypointRecord, group_into_spurs, read_waypoints};

/// Builds [`Line`]s at a fixed geohash precision.
#[derive(Debug, Clone, Copy)]
pub struct GeoIndexBuilder {
    precision: Precision,
}

impl GeoIndexBuilder {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Path of a line's survey file inside `dir`.
    pub fn line_file(dir: &Path, line: &LineName) -> PathBuf {
        dir.join(format!("LineData-{}.csv", line))
    }

    /// Load every named line from `dir` and freeze them into an index.
    pub fn load_dir(&self, dir: &Path, lines: &[LineName]) -> Result<GeoIndex, GeometryError> {
        let mut built = Vec::with_capacity(lines.len());

        for name in lines {
            let path = Self::line_file(dir, name);
            let line = self.load_file(name.clone(), &path).map_err(|e| match e {
                GeometryError::Io { .. } => e,
                other => GeometryError::File {
                    path: path.clone(),
                    source: Box::new(other),
                },
            })?;

            info!(
                line = %line.name(),
                spurs = line.spurs().len(),
                leds = line.led_count(),
                "loaded line geometry"
            );
            built.push(line);
        }

        GeoIndex::new(self.precision, built)
    }

    /// Load one line from a survey CSV file.
    pub fn load_file(&self, name: LineName, path: &Path) -> Result<Line, GeometryError> {
        let file = File::open(path).map_err(|source| GeometryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = read_waypoints(file)?;
        debug!(line = %name, records = records.len(), "read survey records");
        let spurs = group_into_spurs(records)?;
        self.build_line(name, &spurs)
    }

    /// Build a line from waypoint records already grouped by spur.
    pub fn build_line(
        &self,
        name: LineName,
        spurs: &[Vec<WaypointRecord>],
    ) -> Result<Line, GeometryError> {
        if spurs.is_empty() {
            return Err(GeometryError::EmptyLine(name));
        }

        let built = spurs
            .iter()
            .enumerate()
            .map(|(idx, waypoints)| self.build_spur(&name, idx, waypoints))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Line::new(name, built))
    }

    /// Build one spur by walking consecutive waypoint pairs.
    pub fn build_spur(
        &self,
        line: &LineName,
        spur: usize,
        waypoints: &[WaypointRecord],
    ) -> Result<Spur, GeometryError> {
        let missing = |waypoint: usize, field: &'static str| GeometryError::MissingField {
            line: line.clone(),
            spur,
            waypoint,
            field,
        };

        // Every surveyed waypoint must have a position, even the last one.
        let anchors = waypoints
            .iter()
            .enumerate()
            .map(|(waypoint, record)| match record.coordinate() {
                Some(Ok(coord)) => Ok(coord),
                Some(Err(source)) => Err(GeometryError::InvalidWaypointCoordinate {
                    line: line.clone(),
                    spur,
                    waypoint,
                    source,
                }),
                None => Err(missing(waypoint, "coordinate")),
            })
            .collect::<Result<Vec<Coordinate>, _>>()?;

        let mut segments = Vec::with_capacity(waypoints.len().saturating_sub(1));

        for (segment, record) in waypoints.iter().enumerate().skip(1).map(|(i, r)| (i - 1, r)) {
            let waypoint = segment + 1;
            let count = record
                .led_count
                .ok_or_else(|| missing(waypoint, "LED count"))? as usize;

            let mut leds: Vec<LedPoint> = Vec::with_capacity(count);
            let mut previous = anchors[segment];

            for led in 0..count {
                let (dlon, dlat) = if led == 0 {
                    (
                        record
                            .dlon_offset
                            .ok_or_else(|| missing(waypoint, "offset longitude delta"))?,
                        record
                            .dlat_offset
                            .ok_or_else(|| missing(waypoint, "offset latitude delta"))?,
                    )
                } else {
                    (
                        record
                            .dlon_led
                            .ok_or_else(|| missing(waypoint, "LED longitude delta"))?,
                        record
                            .dlat_led
                            .ok_or_else(|| missing(waypoint, "LED latitude delta"))?,
                    )
                };

                let coord = previous.offset(dlon, dlat).map_err(|source| {
                    GeometryError::InvalidLedCoordinate {
                        line: line.clone(),
                        spur,
                        segment,
                        led,
                        source,
                    }
                })?;

                leds.push(LedPoint::new(coord, self.precision)?);
                previous = coord;
            }

            segments.push(Segment::new(segment, record.segment_id, leds));
        }

        let built = Spur::new(segments);
        if built.led_count() == 0 {
            return Err(GeometryError::EmptySpur {
                line: line.clone(),
                spur,
            });
        }

        Ok(built)
    }
}

impl Default for GeoIndexBuilder {
    fn default() -> Self {
        Self::new(Precision::DEFAULT)
    }
}
