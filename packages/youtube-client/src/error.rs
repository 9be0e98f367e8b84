//! Typed errors for transcript and metadata retrieval.

use thiserror::Error;

/// Errors that can occur while resolving video content.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// The link is not a watch or short link
    #[error("Please paste a full, valid YouTube video link.")]
    InvalidUrl,

    /// The link looked right but carried no 11-character id
    #[error("Could not extract video ID from the URL.")]
    MissingVideoId,

    /// HTTP request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// The video has no captions we can read
    #[error("no transcript available: {0}")]
    TranscriptUnavailable(String),

    /// External extraction tool failed (missing binary, non-zero exit, timeout)
    #[error("extractor error: {0}")]
    Extractor(String),

    /// Transcript and every metadata strategy failed
    #[error("unable to retrieve video content ({} attempts failed)", error_log.len())]
    ContentUnavailable { error_log: Vec<String> },
}

impl From<reqwest::Error> for YoutubeError {
    fn from(e: reqwest::Error) -> Self {
        YoutubeError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for YoutubeError {
    fn from(e: serde_json::Error) -> Self {
        YoutubeError::Parse(e.to_string())
    }
}

/// Result type alias for youtube-client operations.
pub type Result<T> = std::result::Result<T, YoutubeError>;
