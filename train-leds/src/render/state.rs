//! What each line looks like this cycle.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::LineName;
use crate::matching::MatchResult;

/// One reported train and where, if anywhere, it was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainSlot {
    pub label: String,
    pub id: String,
    /// `None` when the train is not near any LED.
    pub result: Option<MatchResult>,
}

/// Match results for one line, in feed order.
///
/// Rebuilt from scratch every cycle; nothing carries over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRenderState {
    line: LineName,
    /// LED count per spur, which is also each spur's last position.
    spur_lengths: Vec<usize>,
    trains: Vec<TrainSlot>,
}

impl LineRenderState {
    pub fn new(line: LineName, spur_lengths: Vec<usize>) -> Self {
        Self {
            line,
            spur_lengths,
            trains: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, id: impl Into<String>, result: Option<MatchResult>) {
        self.trains.push(TrainSlot {
            label: label.into(),
            id: id.into(),
            result,
        });
    }

    pub fn line(&self) -> &LineName {
        &self.line
    }

    pub fn spur_count(&self) -> usize {
        self.spur_lengths.len()
    }

    pub fn spur_length(&self, spur: usize) -> Option<usize> {
        self.spur_lengths.get(spur).copied()
    }

    pub fn trains(&self) -> &[TrainSlot] {
        &self.trains
    }

    /// Trains that could not be placed.
    pub fn unmatched(&self) -> usize {
        self.trains.iter().filter(|t| t.result.is_none()).count()
    }

    /// Occupied positions on one spur.
    pub fn occupied(&self, spur: usize) -> BTreeSet<usize> {
        self.placed()
            .filter(|r| r.spur == spur)
            .map(|r| r.position)
            .collect()
    }

    /// Occupied positions for every spur, indexed by spur.
    pub fn by_spur(&self) -> Vec<BTreeSet<usize>> {
        let mut spurs = vec![BTreeSet::new(); self.spur_lengths.len()];
        for r in self.placed() {
            if let Some(positions) = spurs.get_mut(r.spur) {
                positions.insert(r.position);
            }
        }
        spurs
    }

    fn placed(&self) -> impl Iterator<Item = &MatchResult> {
        self.trains.iter().filter_map(|t| t.result.as_ref())
    }
}

/// Input to the two views for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFrame {
    Trains(Vec<LineRenderState>),
    /// The feed could not be read; draw the error display.
    FeedUnavailable { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(spur: usize, position: usize) -> Option<MatchResult> {
        Some(MatchResult {
            spur,
            segment: 0,
            led: position - 1,
            position,
        })
    }

    #[test]
    fn partitions_by_spur_in_order() {
        let mut state = LineRenderState::new(LineName::parse("UP-NW").unwrap(), vec![182, 21]);
        state.push("2230", "8504", hit(0, 78));
        state.push("640", "8501", None);
        state.push("2231", "8505", hit(1, 12));
        state.push("2232", "8506", hit(0, 5));
        state.push("2234", "8507", hit(0, 78));

        assert_eq!(state.trains().len(), 5);
        assert_eq!(state.unmatched(), 1);
        assert_eq!(state.occupied(0).into_iter().collect::<Vec<_>>(), vec![5, 78]);
        assert_eq!(state.occupied(1).into_iter().collect::<Vec<_>>(), vec![12]);

        let spurs = state.by_spur();
        assert_eq!(spurs.len(), 2);
        assert_eq!(spurs[0].len(), 2);
        assert!(spurs[1].contains(&12));
    }

    #[test]
    fn spur_lengths() {
        let state = LineRenderState::new(LineName::parse("UP-NW").unwrap(), vec![182, 21]);
        assert_eq!(state.spur_count(), 2);
        assert_eq!(state.spur_length(1), Some(21));
        assert_eq!(state.spur_length(2), None);
        assert!(state.occupied(0).is_empty());
    }
}
