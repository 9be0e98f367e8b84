//! Caption retrieval from the watch page's `captionTracks`.

use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, YoutubeError};
use crate::page::{browser_client, extract_json_after, fetch_text, YOUTUBE_BASE_URL};
use crate::video_id::VideoId;

/// One entry of `captionTracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    #[serde(rename = "languageCode", default)]
    pub language_code: String,

    /// `"asr"` for auto-generated captions
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_english(&self) -> bool {
        self.language_code == "en" || self.language_code.starts_with("en-")
    }

    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Fetches caption text for a video.
pub struct TranscriptFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl TranscriptFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: browser_client(Duration::from_secs(15))?,
            base_url: YOUTUBE_BASE_URL.to_string(),
        })
    }

    /// Point at a different origin (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the transcript as newline-joined cue text.
    pub async fn fetch(&self, video_id: &VideoId) -> Result<String> {
        let page_url = format!("{}/watch?v={}", self.base_url, video_id);
        let page = fetch_text(&self.client, &page_url).await?;

        let tracks_json = extract_json_after(&page, "\"captionTracks\"").ok_or_else(|| {
            YoutubeError::TranscriptUnavailable("No transcripts were found for this video".into())
        })?;
        let tracks: Vec<CaptionTrack> = serde_json::from_str(tracks_json)?;

        let track = select_track(&tracks).ok_or_else(|| {
            YoutubeError::TranscriptUnavailable("caption track list is empty".into())
        })?;

        debug!(
            video_id = %video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let track_url = if track.base_url.starts_with('/') {
            format!("{}{}", self.base_url, track.base_url)
        } else {
            track.base_url.clone()
        };

        let xml = fetch_text(&self.client, &track_url).await?;
        let text = parse_transcript_xml(&xml);

        if text.trim().is_empty() {
            return Err(YoutubeError::TranscriptUnavailable(
                "caption track contained no text".into(),
            ));
        }

        info!(video_id = %video_id, chars = text.len(), "Transcript fetched");
        Ok(text)
    }
}

/// English manual captions, then English auto-generated, then whatever exists.
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.is_english() && !t.is_generated())
        .or_else(|| tracks.iter().find(|t| t.is_english()))
        .or_else(|| tracks.first())
}

/// Extract cue text from timedtext XML (`<text>` cues, or `<p>` in srv3).
pub fn parse_transcript_xml(xml: &str) -> String {
    let document = Html::parse_fragment(xml);

    let cues: Vec<String> = ["text", "p"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .map(|selector| {
            document
                .select(&selector)
                .map(|el| decode_entities(el.text().collect::<String>().trim()))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
        })
        .find(|cues| !cues.is_empty())
        .unwrap_or_default();

    cues.join("\n")
}

/// Caption payloads are often double-escaped (`&amp;#39;`); decode the second layer.
fn decode_entities(text: &str) -> String {
    if text.contains('&') && text.contains(';') {
        Html::parse_fragment(text)
            .root_element()
            .text()
            .collect::<String>()
    } else {
        text.to_string()
    }
}
