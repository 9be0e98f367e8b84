//! Transcript first, metadata strategies after.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Result, YoutubeError};
use crate::strategies::{default_strategies, MetadataStrategy};
use crate::transcript::TranscriptFetcher;
use crate::types::{ContentSource, VideoContent};
use crate::video_id::VideoId;

/// Resolves quiz source text for a video.
pub struct ContentFetcher {
    transcript: TranscriptFetcher,
    strategies: Vec<Arc<dyn MetadataStrategy>>,
}

impl ContentFetcher {
    /// Live transcript fetcher plus the default strategy chain.
    pub fn new() -> Result<Self> {
        Ok(Self {
            transcript: TranscriptFetcher::new()?,
            strategies: default_strategies()?,
        })
    }

    pub fn with_transcript(mut self, transcript: TranscriptFetcher) -> Self {
        self.transcript = transcript;
        self
    }

    /// Replace the metadata chain; order is preserved.
    pub fn with_strategies(mut self, strategies: Vec<Arc<dyn MetadataStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn fetch(&self, video_id: &VideoId) -> Result<VideoContent> {
        let mut error_log = Vec::new();

        match self.transcript.fetch(video_id).await {
            Ok(text) => {
                return Ok(VideoContent {
                    text,
                    source: ContentSource::Transcript,
                    title: None,
                })
            }
            Err(e) => {
                info!(video_id = %video_id, error = %e, "Transcript unavailable, trying metadata");
                error_log.push(format!("transcript: {}", e));
            }
        }

        for strategy in &self.strategies {
            match strategy.fetch(video_id).await {
                Ok(Some(metadata)) => {
                    info!(
                        video_id = %video_id,
                        strategy = strategy.name(),
                        "Using video metadata"
                    );
                    let title = metadata.title.trim();
                    return Ok(VideoContent {
                        text: metadata.to_content_text(),
                        source: ContentSource::Metadata,
                        title: (!title.is_empty()).then(|| title.to_string()),
                    });
                }
                Ok(None) => {
                    error_log.push(format!("{}: no usable metadata", strategy.name()));
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Metadata strategy failed");
                    error_log.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        Err(YoutubeError::ContentUnavailable { error_log })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VideoMetadata;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Stub {
        name: &'static str,
        result: fn() -> Result<Option<VideoMetadata>>,
        calls: AtomicUsize,
    }

    impl Stub {
        fn new(name: &'static str, result: fn() -> Result<Option<VideoMetadata>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MetadataStrategy for Stub {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, _video_id: &VideoId) -> Result<Option<VideoMetadata>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    async fn no_transcript_server() -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        server
    }

    fn id() -> VideoId {
        VideoId::new("dQw4w9WgXcQ").unwrap()
    }

    #[tokio::test]
    async fn first_usable_strategy_wins() {
        let server = no_transcript_server().await;
        let failing = Stub::new("watch_page", || Err(YoutubeError::Http("Status code 429".into())));
        let empty = Stub::new("oembed", || Ok(None));
        let good = Stub::new("invidious", || {
            Ok(Some(VideoMetadata {
                title: "Quantum Physics".into(),
                description: "Wave functions".into(),
                length_seconds: None,
            }))
        });
        let never = Stub::new("yt_dlp", || Ok(None));

        let fetcher = ContentFetcher::new()
            .unwrap()
            .with_transcript(TranscriptFetcher::new().unwrap().with_base_url(server.url()))
            .with_strategies(vec![failing.clone(), empty.clone(), good.clone(), never.clone()]);

        let content = fetcher.fetch(&id()).await.unwrap();

        assert_eq!(content.source, ContentSource::Metadata);
        assert_eq!(
            content.text,
            "Video Title: Quantum Physics\n\nVideo Description:\nWave functions"
        );
        assert_eq!(content.title.as_deref(), Some("Quantum Physics"));
        assert_eq!(never.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn all_failures_are_logged() {
        let server = no_transcript_server().await;
        let fetcher = ContentFetcher::new()
            .unwrap()
            .with_transcript(TranscriptFetcher::new().unwrap().with_base_url(server.url()))
            .with_strategies(vec![
                Stub::new("watch_page", || Err(YoutubeError::Http("Status code 403".into()))),
                Stub::new("oembed", || Ok(None)),
            ]);

        match fetcher.fetch(&id()).await {
            Err(YoutubeError::ContentUnavailable { error_log }) => {
                assert_eq!(error_log.len(), 3);
                assert!(error_log[0].starts_with("transcript: "));
                assert_eq!(error_log[1], "watch_page: HTTP error: Status code 403");
                assert_eq!(error_log[2], "oembed: no usable metadata");
            }
            other => panic!("expected ContentUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn default_chain_order() {
        let fetcher = ContentFetcher::new().unwrap();
        assert_eq!(
            fetcher.strategy_names(),
            vec!["watch_page", "oembed", "invidious", "yt_dlp", "innertube"]
        );
    }
}
