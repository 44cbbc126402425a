//! Shared state for the status surface.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cycle::CycleReport;
use crate::render::LandmarkTable;

/// Latest cycle report plus the startup landmark table.
///
/// The poller writes once per cycle; handlers only read.
#[derive(Debug, Clone)]
pub struct StatusState {
    report: Arc<RwLock<Option<CycleReport>>>,
    landmarks: Arc<LandmarkTable>,
}

impl StatusState {
    pub fn new(landmarks: Arc<LandmarkTable>) -> Self {
        Self {
            report: Arc::new(RwLock::new(None)),
            landmarks,
        }
    }

    /// Replace the latest report.
    pub async fn publish(&self, report: CycleReport) {
        *self.report.write().await = Some(report);
    }

    /// `None` until the first cycle completes.
    pub async fn latest(&self) -> Option<CycleReport> {
        self.report.read().await.clone()
    }

    pub fn landmarks(&self) -> &LandmarkTable {
        &self.landmarks
    }
}
