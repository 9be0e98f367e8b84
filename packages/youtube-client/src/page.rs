//! Watch-page helpers shared by the transcript fetcher and the page strategy.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use std::time::Duration;

use crate::error::{Result, YoutubeError};

/// Browser-like User-Agent to avoid the consent/bot interstitial.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default YouTube origin.
pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// HTTP client that looks like a desktop browser.
pub fn browser_client(timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| YoutubeError::Http(format!("failed to build HTTP client: {}", e)))
}

/// GET a URL and return the body, failing on non-success statuses.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(YoutubeError::Http(format!("Status code {}", status.as_u16())));
    }

    Ok(response.text().await?)
}

/// Slice out the JSON object or array that follows `marker`.
///
/// Watch pages embed large blobs like `var ytInitialData = {...};` and
/// `"captionTracks":[...]`. The scan is string-aware so braces inside
/// descriptions do not end the value early.
pub fn extract_json_after<'a>(haystack: &'a str, marker: &str) -> Option<&'a str> {
    let after = haystack.find(marker)? + marker.len();
    let rest = &haystack[after..];
    let start = rest.find(|c: char| !c.is_whitespace() && c != '=' && c != ':')?;
    let body = &rest[start..];

    let (open, close) = match body.as_bytes().first()? {
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in body.as_bytes().iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b if b == open => depth += 1,
            b if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}
