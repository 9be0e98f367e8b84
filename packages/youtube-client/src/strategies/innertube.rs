//! The player endpoint the web client itself calls.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::{usable, MetadataStrategy};
use crate::error::{Result, YoutubeError};
use crate::page::{browser_client, YOUTUBE_BASE_URL};
use crate::types::VideoMetadata;
use crate::video_id::VideoId;

const CLIENT_NAME: &str = "WEB";
const CLIENT_VERSION: &str = "2.20240101.00.00";

pub struct InnertubeStrategy {
    client: reqwest::Client,
    base_url: String,
}

impl InnertubeStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: browser_client(Duration::from_secs(10))?,
            base_url: YOUTUBE_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MetadataStrategy for InnertubeStrategy {
    fn name(&self) -> &str {
        "innertube"
    }

    async fn fetch(&self, video_id: &VideoId) -> Result<Option<VideoMetadata>> {
        let body = json!({
            "videoId": video_id.as_str(),
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                    "hl": "en",
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YoutubeError::Http(format!("Status code {}", status.as_u16())));
        }

        let player: Value = response.json().await?;
        let details = &player["videoDetails"];
        if details.is_null() {
            let reason = player["playabilityStatus"]["reason"]
                .as_str()
                .unwrap_or("no videoDetails in player response");
            return Err(YoutubeError::Parse(reason.to_string()));
        }

        Ok(usable(VideoMetadata {
            title: details["title"].as_str().unwrap_or_default().trim().to_string(),
            description: details["shortDescription"]
                .as_str()
                .unwrap_or_default()
                .trim()
                .to_string(),
            length_seconds: details["lengthSeconds"]
                .as_str()
                .and_then(|s| s.parse().ok()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn reads_video_details() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/youtubei/v1/player")
            .match_body(Matcher::PartialJson(json!({
                "videoId": "dQw4w9WgXcQ",
                "context": {"client": {"clientName": "WEB"}}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"videoDetails":{"title":"World War II Summary","shortDescription":"From 1939 to 1945","lengthSeconds":"845"}}"#,
            )
            .create_async()
            .await;

        let strategy = InnertubeStrategy::new().unwrap().with_base_url(server.url());
        let meta = strategy
            .fetch(&VideoId::new("dQw4w9WgXcQ").unwrap())
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(meta.title, "World War II Summary");
        assert_eq!(meta.length_seconds, Some(845));
    }

    #[tokio::test]
    async fn unplayable_video_reports_reason() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/youtubei/v1/player")
            .with_status(200)
            .with_body(r#"{"playabilityStatus":{"status":"LOGIN_REQUIRED","reason":"Sign in to confirm you're not a bot"}}"#)
            .create_async()
            .await;

        let strategy = InnertubeStrategy::new().unwrap().with_base_url(server.url());
        let err = strategy
            .fetch(&VideoId::new("dQw4w9WgXcQ").unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a bot"));
    }
}
