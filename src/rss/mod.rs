//! Feed fetching for Gator.
//!
//! Retrieves a remote RSS or Atom document and turns it into a plain
//! `RssFeed` with HTML entities decoded.

pub mod entities;
pub mod fetcher;
pub mod types;

pub use entities::unescape_html;
pub use fetcher::{parse_feed, validate_url, FeedFetcher};
pub use types::{RssFeed, RssItem};
