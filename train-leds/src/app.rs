//! Startup wiring.
//!
//! Everything that can be wrong with geometry, landmarks or configuration
//! is found here, before the first fetch. A process that starts will not
//! discover a broken line file one observation at a time.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::cycle::{CycleProcessor, Poller, renderers};
use crate::domain::InvalidLineName;
use crate::feed::{FeedClient, FeedError, FeedSource, MockFeed, PositionSource};
use crate::geometry::{GeoIndexBuilder, GeometryError};
use crate::matching::TrainLocator;
use crate::render::{LandmarkError, LandmarkTable, metra_layouts};
use crate::sink::{HttpLedSink, SinkError};
use crate::web::{StatusState, create_router};

/// Errors that stop the process from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load line geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("invalid display layout: {0}")]
    Layout(#[from] InvalidLineName),

    #[error("failed to derive landmarks: {0}")]
    Landmarks(#[from] LandmarkError),

    #[error("failed to set up positions feed: {0}")]
    Feed(#[from] FeedError),

    #[error("failed to set up LED controller client: {0}")]
    Sink(#[from] SinkError),

    #[error("failed to bind status server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("status server failed: {0}")]
    Serve(std::io::Error),
}

/// A fully validated process, ready to poll and serve.
pub struct App {
    poller: Poller<FeedSource, HttpLedSink>,
    status: StatusState,
    status_addr: SocketAddr,
}

impl App {
    pub fn build(config: &AppConfig) -> Result<Self, StartupError> {
        let builder = GeoIndexBuilder::new(config.precision);
        let index = Arc::new(builder.load_dir(&config.route_files_dir, &config.tracked_lines)?);
        let locator = TrainLocator::new(index);

        let layouts = Arc::new(metra_layouts()?);
        let landmarks = Arc::new(LandmarkTable::derive(&layouts, &locator)?);
        info!(landmarks = landmarks.len(), "landmark table derived");

        let source = match &config.mock_feed_path {
            Some(path) => FeedSource::Mock(MockFeed::new(path)?),
            None => FeedSource::Live(FeedClient::new(config.feed_config())?),
        };
        info!(source = %source.describe(), "positions source ready");

        let sink = HttpLedSink::new(config.sink_config())?;
        let status = StatusState::new(landmarks.clone());
        let (text, leds) = renderers(layouts, landmarks);
        let processor = CycleProcessor::new(locator, config.tracked_lines.clone());

        let poller = Poller::new(source, sink, processor, text, leds, status.clone())
            .with_interval(config.fetch_interval);

        Ok(Self {
            poller,
            status,
            status_addr: config.status_addr,
        })
    }

    pub fn poller(&self) -> &Poller<FeedSource, HttpLedSink> {
        &self.poller
    }

    /// Start polling and serve the status surface until the server stops.
    pub async fn serve(self) -> Result<(), StartupError> {
        let listener = tokio::net::TcpListener::bind(self.status_addr)
            .await
            .map_err(|source| StartupError::Bind {
                addr: self.status_addr,
                source,
            })?;
        info!(addr = %self.status_addr, "status server listening");

        tokio::spawn(self.poller.run());

        axum::serve(listener, create_router(self.status))
            .await
            .map_err(StartupError::Serve)
    }
}
