//! Positions feed error types.

use std::path::PathBuf;

/// Errors fetching or decoding the positions feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials rejected
    #[error("unauthorized: check METRA_USERNAME and METRA_PASSWORD")]
    Unauthorized,

    /// Feed returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Credentials could not be turned into a header
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// Mock positions file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
