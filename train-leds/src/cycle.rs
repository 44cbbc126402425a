//! The fetch-match-render cycle.
//!
//! One tick: fetch positions, place every train of every tracked line,
//! print the text strip, POST the LED commands, publish the report for the
//! status surface. Ticks run one after another in a single task, so two
//! cycles never overlap.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::domain::LineName;
use crate::feed::{FeedPositions, FeedUpdate, PositionSource, convert_positions};
use crate::geo::{DistanceMetric, Haversine};
use crate::matching::TrainLocator;
use crate::render::{
    LandmarkTable, LedCommand, LedCommandRenderer, LineLayout, LineRenderState, RenderFrame,
    TextStripRenderer,
};
use crate::sink::{LedSink, SinkError};
use crate::web::StatusState;

/// Turns one fetch into per-line render state.
#[derive(Debug, Clone)]
pub struct CycleProcessor<M = Haversine> {
    locator: TrainLocator<M>,
    tracked: Vec<LineName>,
}

impl<M: DistanceMetric> CycleProcessor<M> {
    /// Every tracked line is expected in the index; startup refuses to
    /// build one without its survey file.
    pub fn new(locator: TrainLocator<M>, tracked: Vec<LineName>) -> Self {
        Self { locator, tracked }
    }

    pub fn tracked(&self) -> &[LineName] {
        &self.tracked
    }

    pub fn locator(&self) -> &TrainLocator<M> {
        &self.locator
    }

    /// One state per tracked line, including lines with no trains.
    pub fn process(&self, positions: &FeedPositions) -> Vec<LineRenderState> {
        for (line, trains) in positions.lines() {
            if !self.tracked.contains(line) {
                debug!(%line, trains = trains.len(), "untracked line");
            }
        }

        self.tracked
            .iter()
            .filter_map(|line| {
                let geometry = self.locator.index().line(line)?;
                let spur_lengths = geometry.spurs().iter().map(|s| s.led_count()).collect();
                let mut state = LineRenderState::new(line.clone(), spur_lengths);

                for train in positions.get(line).unwrap_or_default() {
                    let result = match self.locator.locate(line, train) {
                        Ok(Some(result)) => Some(result),
                        Ok(None) => {
                            debug!(%line, train = %train.label, position = %train.position(), "no LED near train");
                            None
                        }
                        Err(e) => {
                            warn!(%line, train = %train.label, error = %e, "failed to place train");
                            None
                        }
                    };
                    state.push(train.label.clone(), train.id.clone(), result);
                }

                Some(state)
            })
            .collect()
    }
}

/// What the status surface shows about the last completed cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub completed_at: DateTime<Utc>,
    pub feed_available: bool,
    pub lines: Vec<LineRenderState>,
    pub commands: Vec<LedCommand>,
}

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Rendered { trains: usize, placed: usize },
    FeedUnavailable,
    /// The feed answered with nothing; the previous display stays up.
    Skipped,
}

/// Drives the cycle on a fixed interval.
pub struct Poller<S, K, M = Haversine> {
    source: S,
    sink: K,
    processor: CycleProcessor<M>,
    text: TextStripRenderer,
    leds: LedCommandRenderer,
    status: StatusState,
    interval: Duration,
}

impl<S, K, M> Poller<S, K, M>
where
    S: PositionSource,
    K: LedSink,
    M: DistanceMetric,
{
    pub fn new(
        source: S,
        sink: K,
        processor: CycleProcessor<M>,
        text: TextStripRenderer,
        leds: LedCommandRenderer,
        status: StatusState,
    ) -> Self {
        Self {
            source,
            sink,
            processor,
            text,
            leds,
            status,
            interval: Duration::from_secs(20),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Tick forever. The first cycle runs immediately.
    pub async fn run(self) {
        info!(
            source = %self.source.describe(),
            interval_secs = self.interval.as_secs(),
            "starting poller"
        );
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.run_cycle().await;
        }
    }

    pub async fn run_cycle(&self) -> CycleOutcome {
        let (frame, outcome) = match self.fetch().await {
            FeedUpdate::Positions(positions) if positions.is_empty() => {
                warn!("fetch returned no positions, keeping previous display");
                return CycleOutcome::Skipped;
            }
            FeedUpdate::Positions(positions) => {
                info!(
                    lines = positions.line_count(),
                    trains = positions.train_count(),
                    "fetched positions"
                );
                let lines = self.processor.process(&positions);
                let trains = lines.iter().map(|l| l.trains().len()).sum::<usize>();
                let placed = trains - lines.iter().map(|l| l.unmatched()).sum::<usize>();
                (
                    RenderFrame::Trains(lines),
                    CycleOutcome::Rendered { trains, placed },
                )
            }
            FeedUpdate::Unavailable { reason } => {
                error!(%reason, "positions feed unavailable");
                (
                    RenderFrame::FeedUnavailable { reason },
                    CycleOutcome::FeedUnavailable,
                )
            }
        };

        for row in self.text.render(&frame) {
            println!("{row}");
        }

        let commands = self.leds.render(&frame);
        let report = CycleReport {
            completed_at: Utc::now(),
            feed_available: matches!(frame, RenderFrame::Trains(_)),
            lines: match frame {
                RenderFrame::Trains(lines) => lines,
                RenderFrame::FeedUnavailable { .. } => Vec::new(),
            },
            commands: commands.clone(),
        };

        let (sent, ()) = futures::join!(self.sink.send(&commands), self.status.publish(report));
        match sent {
            Ok(()) => debug!(leds = commands.len(), "LED controller updated"),
            Err(e @ SinkError::UnexpectedStatus { .. }) => {
                warn!(error = %e, "LED controller rejected update")
            }
            Err(e) => error!(error = %e, "failed to reach LED controller"),
        }

        if let CycleOutcome::Rendered { trains, placed } = outcome {
            info!(trains, placed, "views updated");
        }
        outcome
    }

    async fn fetch(&self) -> FeedUpdate {
        match self.source.fetch().await {
            Ok(entities) => FeedUpdate::Positions(convert_positions(
                &entities,
                self.processor.locator().index().precision(),
            )),
            Err(e) => FeedUpdate::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

impl<S, K, M> Poller<S, K, M> {
    pub fn status(&self) -> &StatusState {
        &self.status
    }
}

/// Both views over the same layouts and landmarks.
pub fn renderers(
    layouts: Arc<Vec<LineLayout>>,
    landmarks: Arc<LandmarkTable>,
) -> (TextStripRenderer, LedCommandRenderer) {
    (
        TextStripRenderer::new(layouts.clone(), landmarks.clone()),
        LedCommandRenderer::new(layouts, landmarks),
    )
}
