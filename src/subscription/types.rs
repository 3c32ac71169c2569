//! Feed and follow types for Gator.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Placeholder shown when a feed's owner cannot be resolved.
pub const UNKNOWN_OWNER: &str = "unknown";

/// A registered feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Feed ID.
    pub id: Uuid,
    /// Display name chosen by the owner.
    pub name: String,
    /// Feed URL (unique).
    pub url: String,
    /// User who registered the feed.
    pub user_id: Uuid,
    /// When the feed was created.
    pub created_at: DateTime<Utc>,
    /// When the feed was last updated.
    pub updated_at: DateTime<Utc>,
}

/// New feed for creation.
#[derive(Debug, Clone)]
pub struct NewFeed {
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// Owner's user ID.
    pub user_id: Uuid,
}

impl NewFeed {
    /// Create a new feed request.
    pub fn new(name: impl Into<String>, url: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user_id,
        }
    }
}

/// A user's subscription to a feed.
///
/// The user and feed names are denormalized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFollow {
    /// Follow ID.
    pub id: Uuid,
    /// Following user.
    pub user_id: Uuid,
    /// Followed feed.
    pub feed_id: Uuid,
    /// When the follow was created.
    pub created_at: DateTime<Utc>,
    /// When the follow was last updated.
    pub updated_at: DateTime<Utc>,
    /// Name of the following user.
    pub user_name: String,
    /// Name of the followed feed.
    pub feed_name: String,
}

/// Feed annotated with its owner's name for listing.
#[derive(Debug, Clone)]
pub struct FeedWithOwner {
    /// The feed.
    pub feed: Feed,
    /// Owner's name, or `None` if the lookup failed.
    pub owner_name: Option<String>,
}

impl FeedWithOwner {
    /// Owner name for display, degrading to a placeholder.
    pub fn owner_display(&self) -> &str {
        self.owner_name.as_deref().unwrap_or(UNKNOWN_OWNER)
    }
}
