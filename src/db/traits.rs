//! Repository trait for Gator.
//!
//! The subscription model and the command handlers only see this trait,
//! so storage backends can be swapped without touching them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::User;
use crate::subscription::{Feed, FeedFollow, NewFeed};
use crate::Result;

/// Persistence operations for users, feeds and follows.
///
/// Lookups return `Ok(None)` when nothing matches; constraint conflicts
/// surface as the duplicate variants of `GatorError`.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Create a user. Fails with `DuplicateName` if the name is taken.
    async fn create_user(&self, name: &str) -> Result<User>;

    /// Get a user by name.
    async fn get_user(&self, name: &str) -> Result<Option<User>>;

    /// Get a user by ID.
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Delete every user, cascading to their feeds and follows.
    ///
    /// Returns the number of users deleted.
    async fn delete_all_users(&self) -> Result<u64>;

    /// List all users ordered by name.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Create a feed. Fails with `DuplicateFeed` if the URL is taken.
    async fn create_feed(&self, feed: &NewFeed) -> Result<Feed>;

    /// Delete a feed and its follows. Returns false if it did not exist.
    async fn delete_feed(&self, id: Uuid) -> Result<bool>;

    /// List all feeds in registration order.
    async fn list_feeds(&self) -> Result<Vec<Feed>>;

    /// Record that a user follows a feed.
    ///
    /// Fails with `DuplicateFollow` if the pair already exists.
    async fn create_feed_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<FeedFollow>;

    /// List the follows of the named user.
    async fn list_feed_follows_for_user(&self, name: &str) -> Result<Vec<FeedFollow>>;

    /// Remove a follow. Returns false if the pair did not exist.
    async fn delete_feed_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool>;
}
