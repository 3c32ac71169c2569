//! Feed fetcher.
//!
//! One GET per fetch, no retries. The body is read in full and parsed
//! with feed-rs, so both RSS 2.0 and Atom documents are accepted.

use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::rss::entities::unescape_html;
use crate::rss::types::{RssFeed, RssItem};
use crate::{GatorError, Result};

/// HTTP feed fetcher.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a fetcher with the configured User-Agent and timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| GatorError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch and parse the feed at `url`.
    pub async fn fetch(&self, url: &str) -> std::result::Result<RssFeed, FetchError> {
        let url = validate_url(url)?;
        debug!(url = %url, "Fetching feed");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status().as_u16();
        if status >= 300 {
            return Err(FetchError::BadStatus(status));
        }

        let bytes = response.bytes().await.map_err(FetchError::Network)?;
        debug!(url = %url, bytes = bytes.len(), "Feed downloaded");

        parse_feed(&bytes)
    }
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_url(url: &str) -> std::result::Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl(format!(
            "{url}: unsupported scheme {scheme}"
        ))),
    }
}

/// Parse feed bytes, decoding entities in titles and descriptions.
///
/// Item dates keep the document's own text next to the parsed value, so
/// dates feed-rs cannot parse are still reported.
pub fn parse_feed(bytes: &[u8]) -> std::result::Result<RssFeed, FetchError> {
    let feed = parser::parse(bytes).map_err(FetchError::Parse)?;

    let raw_dates = raw_item_dates(bytes)
        .filter(|dates| dates.len() == feed.entries.len())
        .unwrap_or_default();

    let items = feed
        .entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RssItem {
            title: entry
                .title
                .map(|t| unescape_html(&t.content))
                .unwrap_or_default(),
            link: entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default(),
            description: entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body))
                .map(|d| unescape_html(&d))
                .unwrap_or_default(),
            pub_date: raw_dates.get(i).cloned().flatten(),
            published_at: entry.published.or(entry.updated),
        })
        .collect();

    Ok(RssFeed {
        title: feed
            .title
            .map(|t| unescape_html(&t.content))
            .unwrap_or_default(),
        link: feed
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default(),
        description: feed
            .description
            .map(|d| unescape_html(&d.content))
            .unwrap_or_default(),
        items,
    })
}

/// Date element names, in order of preference, for RSS items and Atom
/// entries.
const DATE_TAGS: [&str; 3] = ["pubDate", "published", "updated"];

/// Raw date text of every item or entry, in document order.
///
/// Returns `None` when the document is not UTF-8 or roxmltree rejects it.
fn raw_item_dates(bytes: &[u8]) -> Option<Vec<Option<String>>> {
    let text = std::str::from_utf8(bytes).ok()?;
    let doc = roxmltree::Document::parse(text.trim_start_matches('\u{feff}')).ok()?;

    let dates = doc
        .descendants()
        .filter(|node| node.has_tag_name("item") || node.has_tag_name("entry"))
        .map(|item| {
            DATE_TAGS.iter().find_map(|tag| {
                item.children()
                    .find(|child| child.has_tag_name(*tag))
                    .and_then(|child| child.text())
                    .map(str::trim)
                    .filter(|date| !date.is_empty())
                    .map(ToString::to_string)
            })
        })
        .collect();

    Some(dates)
}
