//! Listing page retrieval from URLs and local files.

use std::fs;
use std::path::Path;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::source::{DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT, SourceConfig};
use crate::{PagefeedError, Result};

/// HTTP client configuration for fetching listing pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT_SECONDS, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

impl From<&SourceConfig> for FetchConfig {
    fn from(source: &SourceConfig) -> Self {
        Self { timeout: source.timeout_seconds, user_agent: source.user_agent.clone() }
    }
}

/// Fetches a listing page as text.
///
/// Non-success status codes are errors. The body is decoded with the
/// charset declared in `Content-Type`, or UTF-8 when none is declared.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| PagefeedError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(PagefeedError::InvalidUrl(format!(
            "unsupported scheme {:?} in {url}",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(PagefeedError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| {
            if e.is_timeout() {
                PagefeedError::Timeout { timeout: config.timeout }
            } else {
                PagefeedError::HttpError(e)
            }
        })?;

    let content = response.text().await?;

    Ok(content)
}

/// Reads a local HTML override.
pub fn fetch_file(path: &Path) -> Result<String> {
    if !path.exists() {
        Err(PagefeedError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(PagefeedError::from)
    }
}
