//! Public Invidious proxies.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{usable, MetadataStrategy};
use crate::error::{Result, YoutubeError};
use crate::page::browser_client;
use crate::types::VideoMetadata;
use crate::video_id::VideoId;

/// Instances in the order they are tried.
pub const DEFAULT_INVIDIOUS_INSTANCES: &[&str] = &[
    "https://inv.nadeko.net",
    "https://invidious.jing.rocks",
    "https://invidious.nerdvpn.de",
    "https://yt.artemislena.eu",
    "https://invidious.privacyredirect.com",
    "https://inv.tux.pizza",
    "https://vid.puffyan.us",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvidiousVideo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    length_seconds: Option<u64>,
}

pub struct InvidiousStrategy {
    client: reqwest::Client,
    instances: Vec<String>,
}

impl InvidiousStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: browser_client(Duration::from_secs(5))?,
            instances: DEFAULT_INVIDIOUS_INSTANCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    pub fn with_instances<I, S>(mut self, instances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instances = instances
            .into_iter()
            .map(|s| s.into().trim_end_matches('/').to_string())
            .collect();
        self
    }

    async fn fetch_from(&self, instance: &str, video_id: &VideoId) -> Result<VideoMetadata> {
        let url = format!("{}/api/v1/videos/{}", instance, video_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::Http(format!("Status code {}", status.as_u16())));
        }

        let video: InvidiousVideo = response.json().await?;
        Ok(VideoMetadata {
            title: video.title.trim().to_string(),
            description: video.description.trim().to_string(),
            length_seconds: video.length_seconds,
        })
    }
}

#[async_trait]
impl MetadataStrategy for InvidiousStrategy {
    fn name(&self) -> &str {
        "invidious"
    }

    /// Per-instance failures are kept in the error message so they reach
    /// the fetcher's error log.
    async fn fetch(&self, video_id: &VideoId) -> Result<Option<VideoMetadata>> {
        let mut failures = Vec::new();

        for instance in &self.instances {
            match self.fetch_from(instance, video_id).await {
                Ok(metadata) if metadata.is_usable() => {
                    debug!(instance = %instance, video_id = %video_id, "Invidious instance answered");
                    return Ok(usable(metadata));
                }
                Ok(_) => {
                    debug!(instance = %instance, "Invidious returned empty metadata");
                    failures.push(format!("Invidious ({}) error: empty metadata", instance));
                }
                Err(e) => {
                    warn!(instance = %instance, error = %e, "Invidious instance failed");
                    failures.push(format!("Invidious ({}) error: {}", instance, e));
                }
            }
        }

        failures.push("All Invidious instances failed".to_string());
        Err(YoutubeError::Http(failures.join("; ")))
    }
}
