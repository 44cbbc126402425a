//! Conversion from feed DTOs to per-line observations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{LineName, TrainObservation};
use crate::geo::{Coordinate, Precision};

use super::types::PositionEntity;

/// One fetch cycle's observations, grouped by line.
///
/// Lines appear in the order the feed first mentions them; trains within a
/// line keep feed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedPositions {
    lines: Vec<(LineName, Vec<TrainObservation>)>,
}

impl FeedPositions {
    pub fn push(&mut self, line: LineName, observation: TrainObservation) {
        match self.lines.iter_mut().find(|(name, _)| *name == line) {
            Some((_, trains)) => trains.push(observation),
            None => self.lines.push((line, vec![observation])),
        }
    }

    pub fn get(&self, line: &LineName) -> Option<&[TrainObservation]> {
        self.lines
            .iter()
            .find(|(name, _)| name == line)
            .map(|(_, trains)| trains.as_slice())
    }

    pub fn lines(&self) -> impl Iterator<Item = (&LineName, &[TrainObservation])> {
        self.lines.iter().map(|(name, trains)| (name, trains.as_slice()))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn train_count(&self) -> usize {
        self.lines.iter().map(|(_, trains)| trains.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What one fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    Positions(FeedPositions),
    /// The feed could not be fetched or decoded.
    Unavailable { reason: String },
}

/// Group feed entities into observations hashed at `precision`.
///
/// Entities without a route or a usable position are skipped.
pub fn convert_positions(entities: &[PositionEntity], precision: Precision) -> FeedPositions {
    let mut positions = FeedPositions::default();

    for entity in entities {
        let id = entity.id.as_deref().unwrap_or("?");
        let Some(vehicle) = &entity.vehicle else {
            debug!(entity = id, "entity has no vehicle section");
            continue;
        };

        let trip = vehicle.trip.clone().unwrap_or_default();
        let Some(route) = trip.route_id.as_deref() else {
            debug!(entity = id, "entity has no route");
            continue;
        };
        let line = match LineName::parse(route) {
            Ok(line) => line,
            Err(e) => {
                warn!(entity = id, error = %e, "skipping entity");
                continue;
            }
        };

        let Some((lat, lon)) = vehicle
            .position
            .as_ref()
            .and_then(|p| Some((p.latitude?, p.longitude?)))
        else {
            debug!(entity = id, %line, "entity has no position");
            continue;
        };
        let coordinate = match Coordinate::new(lat, lon) {
            Ok(c) => c,
            Err(e) => {
                warn!(entity = id, %line, error = %e, "skipping entity");
                continue;
            }
        };

        let descriptor = vehicle.vehicle.clone().unwrap_or_default();
        let label = descriptor.label.unwrap_or_default();
        let vehicle_id = descriptor.id.unwrap_or_default();

        let observation = match TrainObservation::new(label, vehicle_id, coordinate, precision) {
            Ok(o) => o,
            Err(e) => {
                warn!(entity = id, %line, error = %e, "skipping entity");
                continue;
            }
        };
        let mut observation = observation
            .with_start(trip.start_time, trip.start_date.as_deref().and_then(parse_start_date));
        if let Some(timestamp) = entity.publish_timestamp.as_deref().and_then(parse_timestamp) {
            observation = observation.with_timestamp(timestamp);
        }

        positions.push(line, observation);
    }

    positions
}

/// Parse a "YYYYMMDD" service date.
fn parse_start_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::{Position, TripDescriptor, VehicleDescriptor, VehiclePosition};

    fn entity(route: Option<&str>, label: &str, lat: Option<f64>, lon: Option<f64>) -> PositionEntity {
        PositionEntity {
            id: Some(label.to_string()),
            vehicle: Some(VehiclePosition {
                trip: Some(TripDescriptor {
                    route_id: route.map(str::to_string),
                    start_time: Some("09:10:00".to_string()),
                    start_date: Some("20170503".to_string()),
                    ..Default::default()
                }),
                vehicle: Some(VehicleDescriptor {
                    id: Some(format!("v{label}")),
                    label: Some(label.to_string()),
                }),
                position: Some(Position {
                    latitude: lat,
                    longitude: lon,
                    ..Default::default()
                }),
            }),
            publish_timestamp: Some("2017-05-03T14:22:15.179Z".to_string()),
        }
    }

    #[test]
    fn groups_by_line_in_feed_order() {
        let entities = vec![
            entity(Some("UP-NW"), "644", Some(42.113), Some(-88.049)),
            entity(Some("BNSF"), "1200", Some(41.8), Some(-87.9)),
            entity(Some("UP-NW"), "2230", Some(42.0), Some(-87.9)),
        ];

        let positions = convert_positions(&entities, Precision::DEFAULT);
        assert_eq!(positions.line_count(), 2);
        assert_eq!(positions.train_count(), 3);

        let names: Vec<&str> = positions.lines().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["UP-NW", "BNSF"]);

        let upnw = positions.get(&LineName::parse("UP-NW").unwrap()).unwrap();
        let labels: Vec<&str> = upnw.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["644", "2230"]);
    }

    #[test]
    fn carries_trip_details() {
        let positions = convert_positions(
            &[entity(Some("UP-NW"), "644", Some(42.113), Some(-88.049))],
            Precision::DEFAULT,
        );
        let train = &positions.get(&LineName::parse("UP-NW").unwrap()).unwrap()[0];

        assert_eq!(train.id, "v644");
        assert_eq!(train.geohash().as_str(), "dp3rs6");
        assert_eq!(train.start_time.as_deref(), Some("09:10:00"));
        assert_eq!(train.start_date, NaiveDate::from_ymd_opt(2017, 5, 3));
        assert_eq!(
            train.timestamp.map(|t| t.to_rfc3339()),
            Some("2017-05-03T14:22:15.179+00:00".to_string())
        );
    }

    #[test]
    fn skips_unusable_entities() {
        let entities = vec![
            entity(None, "1", Some(42.0), Some(-88.0)),
            entity(Some("UP-NW"), "2", None, Some(-88.0)),
            entity(Some("UP-NW"), "3", Some(120.0), Some(-88.0)),
            entity(Some("UP NW"), "4", Some(42.0), Some(-88.0)),
            PositionEntity::default(),
        ];
        assert!(convert_positions(&entities, Precision::DEFAULT).is_empty());
    }

    #[test]
    fn bad_dates_are_dropped_not_fatal() {
        let mut e = entity(Some("UP-NW"), "644", Some(42.113), Some(-88.049));
        e.publish_timestamp = Some("yesterday".to_string());
        if let Some(trip) = e.vehicle.as_mut().and_then(|v| v.trip.as_mut()) {
            trip.start_date = Some("03/05/2017".to_string());
        }

        let positions = convert_positions(&[e], Precision::DEFAULT);
        let train = &positions.get(&LineName::parse("UP-NW").unwrap()).unwrap()[0];
        assert_eq!(train.timestamp, None);
        assert_eq!(train.start_date, None);
    }
}
