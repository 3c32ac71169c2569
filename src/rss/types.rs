//! Fetched feed types.

use chrono::{DateTime, Utc};

/// A fetched feed channel with its items.
///
/// Produced fresh by every fetch and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<RssItem>,
}

/// A single item of a fetched feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Publication date as written in the document.
    pub pub_date: Option<String>,
    /// Parsed publication time, falling back to the update time.
    pub published_at: Option<DateTime<Utc>>,
}
