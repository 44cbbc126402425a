//! Commands for the physical LED controller.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::landmarks::{Landmark, LandmarkTable};
use super::layout::{LineLayout, StrandLayout};
use super::state::{LineRenderState, RenderFrame};

/// Named colors understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Blue,
    Cyan,
    Green,
    Red,
}

/// Light one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedCommand {
    pub position: usize,
    pub color: LedColor,
}

/// Which color means what on the strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LedPalette {
    pub landmark: LedColor,
    pub train: LedColor,
    pub train_at_landmark: LedColor,
    pub error: LedColor,
}

impl Default for LedPalette {
    fn default() -> Self {
        Self {
            landmark: LedColor::Blue,
            train: LedColor::Green,
            train_at_landmark: LedColor::Cyan,
            error: LedColor::Red,
        }
    }
}

/// Builds the command list POSTed to the controller each cycle.
#[derive(Debug, Clone)]
pub struct LedCommandRenderer {
    layouts: Arc<Vec<LineLayout>>,
    landmarks: Arc<LandmarkTable>,
    palette: LedPalette,
}

impl LedCommandRenderer {
    pub fn new(layouts: Arc<Vec<LineLayout>>, landmarks: Arc<LandmarkTable>) -> Self {
        Self {
            layouts,
            landmarks,
            palette: LedPalette::default(),
        }
    }

    /// Commands for one cycle. Lines without a strand produce nothing.
    pub fn render(&self, frame: &RenderFrame) -> Vec<LedCommand> {
        match frame {
            RenderFrame::Trains(lines) => lines.iter().flat_map(|l| self.render_line(l)).collect(),
            RenderFrame::FeedUnavailable { .. } => self
                .layouts
                .iter()
                .filter_map(|layout| layout.strand().map(|strand| (layout, strand)))
                .flat_map(|(layout, strand)| {
                    self.lit_landmarks(layout, strand)
                        .into_iter()
                        .map(|position| LedCommand {
                            position,
                            color: self.palette.error,
                        })
                })
                .collect(),
        }
    }

    /// Lit landmarks first, then one command per occupied position.
    pub fn render_line(&self, state: &LineRenderState) -> Vec<LedCommand> {
        let Some(layout) = self.layouts.iter().find(|l| l.line() == state.line()) else {
            return Vec::new();
        };
        let Some(strand) = layout.strand() else {
            return Vec::new();
        };

        let lit = self.lit_landmarks(layout, strand);
        let mut commands: Vec<LedCommand> = lit
            .iter()
            .map(|&position| LedCommand {
                position,
                color: self.palette.landmark,
            })
            .collect();

        for (spur, positions) in state.by_spur().into_iter().enumerate() {
            for position in positions {
                let Some(physical) = strand.physical_index(spur, position) else {
                    continue;
                };
                let color = if lit.contains(&physical) {
                    self.palette.train_at_landmark
                } else {
                    self.palette.train
                };
                commands.push(LedCommand {
                    position: physical,
                    color,
                });
            }
        }

        commands
    }

    fn lit_landmarks(&self, layout: &LineLayout, strand: &StrandLayout) -> BTreeSet<usize> {
        self.landmarks
            .for_line(layout.line())
            .filter(|l| l.lit)
            .filter_map(|l: &Landmark| strand.physical_index(l.spur, l.position))
            .collect()
    }
}
