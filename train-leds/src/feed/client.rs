//! Live positions feed client.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::error::FeedError;
use super::types::PositionEntity;

/// Default base URL for the Metra GTFS API.
const DEFAULT_BASE_URL: &str = "https://gtfsapi.metrarail.com";

const POSITIONS_PATH: &str = "/gtfs/positions";

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Basic auth user
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the positions feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();

        let token = STANDARD.encode(format!("{}:{}", config.username, config.password));
        let mut auth = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|e| FeedError::Credentials(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn positions_url(&self) -> String {
        format!("{}{}", self.base_url, POSITIONS_PATH)
    }

    /// Fetch the current vehicle positions.
    pub async fn fetch_positions(&self) -> Result<Vec<PositionEntity>, FeedError> {
        let response = self.http.get(self.positions_url()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FeedError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
