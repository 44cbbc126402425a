//! Position-to-LED matching.
//!
//! [`NearestLedMatcher`] finds the LED slot for a live position using the
//! geohash nine-box as a coarse filter and physical distance to break
//! ties. [`SpurPositionResolver`] turns a slot into the 1-based position
//! along its spur's strand. [`TrainLocator`] runs both for one train.

mod error;
mod locator;
mod matcher;
mod resolver;

pub use error::MatchError;
pub use locator::{MatchResult, TrainLocator};
pub use matcher::NearestLedMatcher;
pub use resolver::{SpurPositionResolver, absolute_position};
