//! Subscription model for Gator.
//!
//! Users own feeds and follow any feed; this module holds the feed and
//! follow types and the service enforcing how they relate.

pub mod service;
pub mod types;

pub use service::{find_feed_by_url, SubscriptionService};
pub use types::{Feed, FeedFollow, FeedWithOwner, NewFeed, UNKNOWN_OWNER};
