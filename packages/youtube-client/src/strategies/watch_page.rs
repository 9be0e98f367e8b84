//! Scrape the public watch page for title and description.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{usable, MetadataStrategy};
use crate::error::Result;
use crate::page::{browser_client, extract_json_after, fetch_text, YOUTUBE_BASE_URL};
use crate::types::VideoMetadata;
use crate::video_id::VideoId;

lazy_static! {
    static ref SHORT_DESCRIPTION_REGEX: Regex =
        Regex::new(r#""shortDescription":"((?:[^"\\]|\\.)*)""#).unwrap();
}

/// `shortDescription` values this short are usually placeholders.
const MIN_SHORT_DESCRIPTION: usize = 20;

pub struct WatchPageStrategy {
    client: reqwest::Client,
    base_url: String,
}

impl WatchPageStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: browser_client(Duration::from_secs(15))?,
            base_url: YOUTUBE_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MetadataStrategy for WatchPageStrategy {
    fn name(&self) -> &str {
        "watch_page"
    }

    async fn fetch(&self, video_id: &VideoId) -> Result<Option<VideoMetadata>> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);
        let page = fetch_text(&self.client, &url).await?;
        let metadata = parse_watch_page(&page);
        debug!(
            video_id = %video_id,
            title_len = metadata.title.len(),
            description_len = metadata.description.len(),
            "Parsed watch page"
        );
        Ok(usable(metadata))
    }
}

/// Pull title and description out of watch-page HTML.
pub(crate) fn parse_watch_page(page: &str) -> VideoMetadata {
    let document = Html::parse_document(page);

    let title = meta_content(&document, "og:title")
        .or_else(|| {
            let selector = Selector::parse("title").ok()?;
            let text = document.select(&selector).next()?.text().collect::<String>();
            let text = text.trim().trim_end_matches(" - YouTube").trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_default();

    let description = meta_content(&document, "og:description")
        .or_else(|| player_description(page))
        .or_else(|| regex_description(page))
        .or_else(|| initial_data_description(page))
        .unwrap_or_default();

    let length_seconds = player_response(page).and_then(|v| {
        v["videoDetails"]["lengthSeconds"]
            .as_str()
            .and_then(|s| s.parse().ok())
    });

    VideoMetadata {
        title,
        description,
        length_seconds,
    }
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{}"]"#, property)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn player_response(page: &str) -> Option<Value> {
    let json = extract_json_after(page, "ytInitialPlayerResponse")?;
    serde_json::from_str(json).ok()
}

fn player_description(page: &str) -> Option<String> {
    let response = player_response(page)?;
    let description = response["videoDetails"]["shortDescription"].as_str()?.trim();
    (description.len() > MIN_SHORT_DESCRIPTION).then(|| description.to_string())
}

fn regex_description(page: &str) -> Option<String> {
    let raw = SHORT_DESCRIPTION_REGEX.captures(page)?.get(1)?.as_str();
    let description = raw
        .replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\'", "'");
    let description = description.trim();
    (description.len() > MIN_SHORT_DESCRIPTION).then(|| description.to_string())
}

fn initial_data_description(page: &str) -> Option<String> {
    let json = extract_json_after(page, "var ytInitialData")?;
    let data: Value = serde_json::from_str(json).ok()?;

    let contents = data["contents"]["twoColumnWatchNextResults"]["results"]["results"]
        ["contents"]
        .as_array()?;

    let runs = contents.iter().find_map(|item| {
        item["videoSecondaryInfoRenderer"]["description"]["runs"].as_array()
    })?;

    let description = runs
        .iter()
        .filter_map(|run| run["text"].as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}
