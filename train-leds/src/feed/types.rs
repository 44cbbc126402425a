//! Positions feed response DTOs.
//!
//! These map the GTFS-realtime JSON rendering served at `/gtfs/positions`.
//! Nearly everything is optional: the feed omits fields rather than
//! sending nulls, and a single malformed entity must not sink the batch.

use serde::Deserialize;

/// One entity of the positions array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionEntity {
    pub id: Option<String>,

    pub vehicle: Option<VehiclePosition>,

    /// When the agency published this entity (ISO 8601).
    #[serde(rename = "metra-publish-tstamp")]
    pub publish_timestamp: Option<String>,
}

/// Where a vehicle is and which trip it is running.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehiclePosition {
    pub trip: Option<TripDescriptor>,
    pub vehicle: Option<VehicleDescriptor>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripDescriptor {
    pub trip_id: Option<String>,
    /// Line identifier, e.g. "UP-NW".
    pub route_id: Option<String>,
    /// Advertised start time, "HH:MM:SS".
    pub start_time: Option<String>,
    /// Service date, "YYYYMMDD".
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleDescriptor {
    pub id: Option<String>,
    /// Train number shown to riders.
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Position {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bearing: Option<f64>,
    pub speed: Option<f64>,
}
