//! Mock positions feed for running without API access.
//!
//! Serves a saved `/gtfs/positions` response from disk. The file is re-read
//! on every fetch so it can be edited while the poller runs.

use std::path::{Path, PathBuf};

use super::error::FeedError;
use super::types::PositionEntity;

#[derive(Debug, Clone)]
pub struct MockFeed {
    path: PathBuf,
}

impl MockFeed {
    /// Create a mock feed, checking the file parses now rather than on
    /// the first tick.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let feed = Self {
            path: path.as_ref().to_path_buf(),
        };
        feed.load()?;
        Ok(feed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn fetch_positions(&self) -> Result<Vec<PositionEntity>, FeedError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse(&json)
    }

    fn load(&self) -> Result<Vec<PositionEntity>, FeedError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse(&json)
    }
}

fn parse(json: &str) -> Result<Vec<PositionEntity>, FeedError> {
    serde_json::from_str(json).map_err(|e| FeedError::Json {
        message: e.to_string(),
        body: None,
    })
}
