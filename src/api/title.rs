//! Provides a client that resolves a web page's `<title>` for a URL.
//!
//! This is what pre-fills the title when a bookmark is added; a URL that cannot be
//! fetched is treated as invalid.

use crate::error::Result;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// An asynchronous client for fetching page titles.
pub struct TitleFetcher {
    client: Client,
}

impl TitleFetcher {
    /// Creates a new `TitleFetcher` whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` if the underlying client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bookmarks/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns its page title.
    ///
    /// URLs typed without a scheme are requested over `https://`. Returns `None` when the
    /// page cannot be fetched or answers with an error status. A page without a usable
    /// `<title>` is titled with the URL itself.
    pub async fn fetch_title(&self, url: &str) -> Option<String> {
        let url = url.trim();
        let target = with_scheme(url);
        info!("Fetching title for {}", target);

        let response = match self.client.get(&target).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", target, e);
                return None;
            },
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    "Request to {} answered with status {}",
                    target,
                    e.status().unwrap_or_default()
                );
                return None;
            },
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read body of {}: {}", target, e);
                return None;
            },
        };

        let title = extract_title(&body).unwrap_or_else(|| {
            debug!("No <title> found at {}, using the url", target);
            url.to_string()
        });
        debug!("Resolved title '{}' for {}", title, target);
        Some(title)
    }
}

/// Prepends `https://` unless the URL already names a scheme.
pub fn with_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Extracts the first `<title>` element of an HTML document, whitespace collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();
    let re = TITLE_RE.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
    });

    let raw = re.captures(html)?.get(1)?.as_str();
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let title = decode_entities(&collapsed);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Decodes the handful of HTML entities that commonly show up in titles.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
