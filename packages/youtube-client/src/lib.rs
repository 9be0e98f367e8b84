//! YouTube content retrieval for quiz generation.
//!
//! Resolves a pasted link to a [`VideoId`], then produces text for the
//! video: the caption transcript when one exists, otherwise title and
//! description metadata from the first strategy that answers.
//!
//! # Example
//!
//! ```rust,ignore
//! use youtube_client::{ContentFetcher, VideoId};
//!
//! let id = VideoId::from_url("https://youtu.be/dQw4w9WgXcQ")?;
//! let content = ContentFetcher::new()?.fetch(&id).await?;
//! println!("{:?}: {} chars", content.source, content.text.len());
//! ```

pub mod error;
pub mod fetcher;
pub mod page;
pub mod strategies;
pub mod transcript;
pub mod types;
pub mod video_id;

pub use error::{Result, YoutubeError};
pub use fetcher::ContentFetcher;
pub use strategies::MetadataStrategy;
pub use transcript::TranscriptFetcher;
pub use types::{ContentSource, VideoContent, VideoMetadata};
pub use video_id::VideoId;
