//! Where positions come from.

use std::future::Future;

use super::client::FeedClient;
use super::error::FeedError;
use super::mock::MockFeed;
use super::types::PositionEntity;

/// Something that yields the current positions array.
///
/// Implemented by the live client, the mock file, and test doubles.
pub trait PositionSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<PositionEntity>, FeedError>> + Send;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

impl PositionSource for FeedClient {
    async fn fetch(&self) -> Result<Vec<PositionEntity>, FeedError> {
        self.fetch_positions().await
    }

    fn describe(&self) -> String {
        self.positions_url()
    }
}

impl PositionSource for MockFeed {
    async fn fetch(&self) -> Result<Vec<PositionEntity>, FeedError> {
        self.fetch_positions().await
    }

    fn describe(&self) -> String {
        format!("mock file {}", self.path().display())
    }
}

/// The source picked from configuration at startup.
#[derive(Debug, Clone)]
pub enum FeedSource {
    Live(FeedClient),
    Mock(MockFeed),
}

impl PositionSource for FeedSource {
    async fn fetch(&self) -> Result<Vec<PositionEntity>, FeedError> {
        match self {
            FeedSource::Live(client) => client.fetch_positions().await,
            FeedSource::Mock(mock) => mock.fetch_positions().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            FeedSource::Live(client) => client.describe(),
            FeedSource::Mock(mock) => mock.describe(),
        }
    }
}
