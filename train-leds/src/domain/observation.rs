//! Live train positions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::geo::{Coordinate, Geohash, GeohashError, Precision};

/// One train's reported position for the current fetch cycle.
///
/// The geohash is computed at construction with the same precision as the
/// LED index, so the matcher can compare cells directly. Observations are
/// never kept between cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainObservation {
    /// Train number shown to riders (e.g. "2230").
    pub label: String,
    /// Vehicle identifier from the feed.
    pub id: String,
    /// When the feed published this position.
    pub timestamp: Option<DateTime<Utc>>,
    /// Advertised trip start time, as published ("HH:MM:SS", may exceed 24h).
    pub start_time: Option<String>,
    /// Service date of the trip.
    pub start_date: Option<NaiveDate>,
    position: Coordinate,
    geohash: Geohash,
}

impl TrainObservation {
    /// Create an observation at `position`, hashing it at `precision`.
    pub fn new(
        label: impl Into<String>,
        id: impl Into<String>,
        position: Coordinate,
        precision: Precision,
    ) -> Result<Self, GeohashError> {
        Ok(Self {
            label: label.into(),
            id: id.into(),
            timestamp: None,
            start_time: None,
            start_date: None,
            position,
            geohash: Geohash::encode(&position, precision)?,
        })
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_start(mut self, start_time: Option<String>, start_date: Option<NaiveDate>) -> Self {
        self.start_time = start_time;
        self.start_date = start_date;
        self
    }

    /// Override the computed geohash.
    ///
    /// Used when a feed already supplies a cell for the position.
    pub fn with_geohash(mut self, geohash: Geohash) -> Self {
        self.geohash = geohash;
        self
    }

    pub fn position(&self) -> &Coordinate {
        &self.position
    }

    pub fn geohash(&self) -> &Geohash {
        &self.geohash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geohash_follows_position() {
        let obs = TrainObservation::new(
            "2230",
            "8504",
            Coordinate::new(42.113, -88.049).unwrap(),
            Precision::DEFAULT,
        )
        .unwrap();
        assert_eq!(obs.geohash().as_str(), "dp3rs6");
        assert_eq!(obs.label, "2230");
        assert_eq!(obs.id, "8504");
        assert!(obs.timestamp.is_none());
    }

    #[test]
    fn builders_fill_optional_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let obs = TrainObservation::new(
            "2230",
            "8504",
            Coordinate::new(42.113, -88.049).unwrap(),
            Precision::new(5).unwrap(),
        )
        .unwrap()
        .with_start(Some("16:35:00".to_string()), Some(date))
        .with_geohash(Geohash::parse("dp3rs").unwrap());

        assert_eq!(obs.start_time.as_deref(), Some("16:35:00"));
        assert_eq!(obs.start_date, Some(date));
        assert_eq!(obs.geohash().as_str(), "dp3rs");
    }
}
