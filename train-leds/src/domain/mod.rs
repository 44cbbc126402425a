//! Domain types for the LED rail map.
//!
//! A [`Line`] owns ordered [`Spur`]s, each spur owns ordered [`Segment`]s,
//! and each segment owns the [`LedPoint`]s surveyed along it. All types
//! enforce their invariants at construction time and are immutable once
//! built, so matching code can trust their validity.

mod line;
mod observation;

pub use line::{InvalidLineName, LedPoint, LedSlot, Line, LineName, Segment, Spur};
pub use observation::TrainObservation;
