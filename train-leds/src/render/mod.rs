//! The two views of a cycle: a console strip and LED controller commands.

mod commands;
mod landmarks;
mod layout;
mod state;
mod text;

pub use commands::{LedColor, LedCommand, LedCommandRenderer};
pub use landmarks::{Landmark, LandmarkError, LandmarkTable};
pub use layout::{LandmarkLocation, LandmarkSpec, LineLayout, StrandLayout, metra_layouts};
pub use state::{LineRenderState, RenderFrame, TrainSlot};
pub use text::TextStripRenderer;
