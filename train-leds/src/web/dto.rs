//! Data transfer objects for status responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cycle::CycleReport;
use crate::render::{LineRenderState, TrainSlot};

/// Occupancy of every tracked line after the latest cycle.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    /// When the cycle finished
    pub completed_at: DateTime<Utc>,

    /// False when the last fetch failed and the error display is up
    pub feed_available: bool,

    pub lines: Vec<LineStatus>,
}

/// One line's trains and lit positions.
#[derive(Debug, Serialize)]
pub struct LineStatus {
    /// Line name, e.g. "UP-NW"
    pub line: String,

    /// Trains in feed order
    pub trains: Vec<TrainStatus>,

    /// Occupied positions, indexed by spur
    pub occupied: Vec<Vec<usize>>,

    /// Trains not near any LED
    pub unmatched: usize,
}

/// One reported train.
#[derive(Debug, Serialize)]
pub struct TrainStatus {
    pub label: String,
    pub id: String,
    /// Absent when the train could not be placed
    pub spur: Option<usize>,
    pub position: Option<usize>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<&CycleReport> for LinesResponse {
    fn from(report: &CycleReport) -> Self {
        Self {
            completed_at: report.completed_at,
            feed_available: report.feed_available,
            lines: report.lines.iter().map(LineStatus::from).collect(),
        }
    }
}

impl From<&LineRenderState> for LineStatus {
    fn from(state: &LineRenderState) -> Self {
        Self {
            line: state.line().to_string(),
            trains: state.trains().iter().map(TrainStatus::from).collect(),
            occupied: state
                .by_spur()
                .into_iter()
                .map(|positions| positions.into_iter().collect())
                .collect(),
            unmatched: state.unmatched(),
        }
    }
}

impl From<&TrainSlot> for TrainStatus {
    fn from(slot: &TrainSlot) -> Self {
        Self {
            label: slot.label.clone(),
            id: slot.id.clone(),
            spur: slot.result.map(|r| r.spur),
            position: slot.result.map(|r| r.position),
        }
    }
}
