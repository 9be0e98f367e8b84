//! oEmbed endpoint: title only, but rarely blocked.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{usable, MetadataStrategy};
use crate::error::{Result, YoutubeError};
use crate::page::{browser_client, YOUTUBE_BASE_URL};
use crate::types::VideoMetadata;
use crate::video_id::VideoId;

/// oEmbed carries no description; this placeholder is sent instead.
pub const OEMBED_DESCRIPTION: &str = "Description unavailable (fetched via oEmbed)";

#[derive(Debug, Deserialize)]
struct OembedResponse {
    #[serde(default)]
    title: String,
}

pub struct OembedStrategy {
    client: reqwest::Client,
    base_url: String,
}

impl OembedStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: browser_client(Duration::from_secs(5))?,
            base_url: YOUTUBE_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MetadataStrategy for OembedStrategy {
    fn name(&self) -> &str {
        "oembed"
    }

    async fn fetch(&self, video_id: &VideoId) -> Result<Option<VideoMetadata>> {
        let response = self
            .client
            .get(format!("{}/oembed", self.base_url))
            .query(&[("url", video_id.watch_url().as_str()), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::Http(format!("Status code {}", status.as_u16())));
        }

        let body: OembedResponse = response.json().await?;
        let title = body.title.trim().to_string();
        if title.is_empty() {
            return Ok(None);
        }

        Ok(usable(VideoMetadata {
            title,
            description: OEMBED_DESCRIPTION.to_string(),
            length_seconds: None,
        }))
    }
}
