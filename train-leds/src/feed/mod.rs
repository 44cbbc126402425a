//! Metra GTFS positions feed.
//!
//! The live feed is a JSON array of GTFS-realtime vehicle entities served
//! behind HTTP basic auth. Each fetch is converted into per-line train
//! observations, geohashed at the LED index precision.

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{FeedClient, FeedConfig};
pub use convert::{FeedPositions, FeedUpdate, convert_positions};
pub use error::FeedError;
pub use mock::MockFeed;
pub use source::{FeedSource, PositionSource};
pub use types::{Position, PositionEntity, TripDescriptor, VehicleDescriptor, VehiclePosition};
