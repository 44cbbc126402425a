//! LED controller client.
//!
//! The controller replaces its whole display on every POST, so each call
//! carries the complete command list for the cycle.

use std::future::Future;
use std::time::Duration;

use crate::render::LedCommand;

/// Default address of the local LED controller.
const DEFAULT_URL: &str = "http://localhost:8675";

/// Errors sending commands to the controller.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Controller answered with something other than 201 Created
    #[error("controller returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Something that displays LED commands.
pub trait LedSink {
    fn send(&self, commands: &[LedCommand]) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Configuration for the controller client.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Controller URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SinkConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 5,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// POSTs command lists to the controller as JSON.
#[derive(Debug, Clone)]
pub struct HttpLedSink {
    http: reqwest::Client,
    url: String,
}

impl HttpLedSink {
    pub fn new(config: SinkConfig) -> Result<Self, SinkError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }
}

impl LedSink for HttpLedSink {
    async fn send(&self, commands: &[LedCommand]) -> Result<(), SinkError> {
        let response = self.http.post(&self.url).json(commands).send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
