// Content source backed by the YouTube fetcher chain

use async_trait::async_trait;
use youtube_client::{ContentFetcher, VideoContent, VideoId};

use super::BaseContentSource;

#[async_trait]
impl BaseContentSource for ContentFetcher {
    async fn fetch_content(&self, video_id: &VideoId) -> youtube_client::Result<VideoContent> {
        self.fetch(video_id).await
    }
}
