//! Content types produced by the fetcher.

use serde::{Deserialize, Serialize};

/// Where the quiz text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Transcript,
    Metadata,
}

impl ContentSource {
    /// Storage/wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSource::Transcript => "transcript",
            ContentSource::Metadata => "metadata",
        }
    }

    /// Inverse of [`ContentSource::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "transcript" => Some(ContentSource::Transcript),
            "metadata" => Some(ContentSource::Metadata),
            _ => None,
        }
    }

    /// Human wording used in prompts.
    pub fn description(&self) -> &'static str {
        match self {
            ContentSource::Transcript => "transcript/subtitles",
            ContentSource::Metadata => "video title and description",
        }
    }
}

/// Title/description metadata returned by a strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub length_seconds: Option<u64>,
}

impl VideoMetadata {
    /// Usable when there is at least a title or a description.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty() || !self.description.trim().is_empty()
    }

    /// Render as prompt text.
    pub fn to_content_text(&self) -> String {
        let title = match self.title.trim() {
            "" => "Video",
            t => t,
        };
        let description = self.description.trim();
        if description.is_empty() {
            format!("Video Title: {}", title)
        } else {
            format!("Video Title: {}\n\nVideo Description:\n{}", title, description)
        }
    }
}

/// Text resolved for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoContent {
    pub text: String,
    pub source: ContentSource,
    /// Title, when a metadata strategy supplied one
    pub title: Option<String>,
}
