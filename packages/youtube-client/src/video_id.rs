//! Video id parsing.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, YoutubeError};

const WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";
const SHORT_PREFIX: &str = "https://youtu.be/";

lazy_static! {
    static ref VIDEO_ID_REGEX: Regex = Regex::new(r"(?:v=|youtu\.be/)([a-zA-Z0-9_-]{11})").unwrap();
}

/// An 11-character YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate a bare id.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let valid = id.len() == 11
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(id))
        } else {
            Err(YoutubeError::MissingVideoId)
        }
    }

    /// Parse a pasted link.
    ///
    /// Only full watch links and youtu.be short links are accepted.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        if !url.starts_with(WATCH_PREFIX) && !url.starts_with(SHORT_PREFIX) {
            return Err(YoutubeError::InvalidUrl);
        }

        VIDEO_ID_REGEX
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or(YoutubeError::MissingVideoId)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this id.
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_PREFIX, self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = YoutubeError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}
