//! LED geometry index.
//!
//! Survey files describe each line as ordered waypoints with pre-surveyed
//! LED counts and per-LED deltas. At startup they are parsed, walked pair
//! by pair into segments of [`LedPoint`](crate::domain::LedPoint)s, and
//! frozen into a [`GeoIndex`] that the matcher and resolver share.

mod builder;
mod error;
mod index;
mod record;

pub use builder::GeoIndexBuilder;
pub use error::GeometryError;
pub use index::GeoIndex;
pub use record::{WaypointRecord, group_into_spurs, read_waypoints};
