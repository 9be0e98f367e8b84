//! Shell out to `yt-dlp` for metadata.

use async_trait::async_trait;
use serde::Deserialize;
use std::io::Write;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{usable, MetadataStrategy};
use crate::error::{Result, YoutubeError};
use crate::types::VideoMetadata;
use crate::video_id::VideoId;

const DEFAULT_BINARY: &str = "yt-dlp";

#[derive(Debug, Deserialize)]
struct DumpJson {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

pub struct YtDlpStrategy {
    binary: String,
    cookies: Option<String>,
    timeout: Duration,
}

impl YtDlpStrategy {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            cookies: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// `YT_DLP_PATH` (default `yt-dlp`) and `YOUTUBE_COOKIES_CONTENT`.
    pub fn from_env() -> Self {
        let binary = std::env::var("YT_DLP_PATH").unwrap_or_else(|_| DEFAULT_BINARY.to_string());
        let cookies = std::env::var("YOUTUBE_COOKIES_CONTENT")
            .ok()
            .filter(|c| !c.trim().is_empty());
        Self::new(binary).with_cookies(cookies)
    }

    /// Netscape-format cookie jar contents.
    pub fn with_cookies(mut self, cookies: Option<String>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn write_cookie_file(&self) -> Result<Option<tempfile::NamedTempFile>> {
        let Some(cookies) = &self.cookies else {
            return Ok(None);
        };

        let mut file = tempfile::Builder::new()
            .prefix("yt-cookies-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| YoutubeError::Extractor(format!("cookie file: {}", e)))?;
        file.write_all(cookies.as_bytes())
            .map_err(|e| YoutubeError::Extractor(format!("cookie file: {}", e)))?;

        Ok(Some(file))
    }
}

#[async_trait]
impl MetadataStrategy for YtDlpStrategy {
    fn name(&self) -> &str {
        "yt_dlp"
    }

    async fn fetch(&self, video_id: &VideoId) -> Result<Option<VideoMetadata>> {
        // Removed on drop, after the child has exited.
        let cookie_file = self.write_cookie_file()?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--dump-single-json")
            .arg("--skip-download")
            .arg("--no-warnings")
            .args(["--socket-timeout", "10"])
            .kill_on_drop(true);
        if let Some(file) = &cookie_file {
            command.arg("--cookies").arg(file.path());
        }
        command.arg(video_id.watch_url());

        debug!(binary = %self.binary, video_id = %video_id, cookies = cookie_file.is_some(), "Running yt-dlp");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| YoutubeError::Extractor(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| YoutubeError::Extractor(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "yt-dlp exited with failure");
            return Err(YoutubeError::Extractor(format!(
                "exit status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let metadata = parse_dump(&output.stdout)?;
        Ok(usable(metadata))
    }
}

fn parse_dump(stdout: &[u8]) -> Result<VideoMetadata> {
    let dump: DumpJson = serde_json::from_slice(stdout)?;
    Ok(VideoMetadata {
        title: dump.title.unwrap_or_default().trim().to_string(),
        description: dump.description.unwrap_or_default().trim().to_string(),
        length_seconds: dump.duration.filter(|d| *d >= 0.0).map(|d| d as u64),
    })
}
