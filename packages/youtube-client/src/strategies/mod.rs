//! Metadata strategies tried when no transcript is available.
//!
//! Each strategy is independent: a failure in one never prevents the next
//! from running. Order is decided by [`default_strategies`].

mod innertube;
mod invidious;
mod oembed;
mod watch_page;
mod yt_dlp;

pub use innertube::InnertubeStrategy;
pub use invidious::{InvidiousStrategy, DEFAULT_INVIDIOUS_INSTANCES};
pub use oembed::{OembedStrategy, OEMBED_DESCRIPTION};
pub use watch_page::WatchPageStrategy;
pub use yt_dlp::YtDlpStrategy;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::VideoMetadata;
use crate::video_id::VideoId;

/// A single way of obtaining title/description metadata.
#[async_trait]
pub trait MetadataStrategy: Send + Sync {
    /// Short name used in the error log.
    fn name(&self) -> &str;

    /// `Ok(None)` when the source answered but had nothing usable.
    async fn fetch(&self, video_id: &VideoId) -> Result<Option<VideoMetadata>>;
}

/// Production order: watch page, oEmbed, Invidious, yt-dlp, InnerTube.
pub fn default_strategies() -> Result<Vec<Arc<dyn MetadataStrategy>>> {
    Ok(vec![
        Arc::new(WatchPageStrategy::new()?),
        Arc::new(OembedStrategy::new()?),
        Arc::new(InvidiousStrategy::new()?),
        Arc::new(YtDlpStrategy::from_env()),
        Arc::new(InnertubeStrategy::new()?),
    ])
}

/// Keep metadata only when it has a title or description.
pub(crate) fn usable(metadata: VideoMetadata) -> Option<VideoMetadata> {
    metadata.is_usable().then_some(metadata)
}
