//! Read-only status surface.
//!
//! Exposes the latest cycle's occupancy, the LED commands last sent to the
//! controller, and the landmark table derived at startup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::StatusState;
