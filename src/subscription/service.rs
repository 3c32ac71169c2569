//! Subscription service for Gator.
//!
//! High-level operations on users, feeds and follows, built on the
//! `Repository` trait.

use tracing::{info, warn};

use crate::db::{Repository, User};
use crate::subscription::types::{Feed, FeedFollow, FeedWithOwner, NewFeed};
use crate::{GatorError, Result};

/// Find a feed by URL in an already fetched list.
///
/// This is a linear scan; catalogs are expected to stay small.
pub fn find_feed_by_url<'f>(feeds: &'f [Feed], url: &str) -> Result<&'f Feed> {
    feeds
        .iter()
        .find(|feed| feed.url == url)
        .ok_or_else(|| GatorError::NotFound(format!("feed with url {url}")))
}

/// Service for user, feed and follow operations.
pub struct SubscriptionService<'a> {
    repo: &'a dyn Repository,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new service over the given repository.
    pub fn new(repo: &'a dyn Repository) -> Self {
        Self { repo }
    }

    /// Register a new user.
    ///
    /// Fails with `DuplicateName` if the name is taken.
    pub async fn create_user(&self, name: &str) -> Result<User> {
        let user = self.repo.create_user(name).await?;
        info!(user = %user.name, id = %user.id, "User created");
        Ok(user)
    }

    /// Get a user by name.
    pub async fn get_user(&self, name: &str) -> Result<User> {
        self.repo
            .get_user(name)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("user {name}")))
    }

    /// Delete every user along with their feeds and follows.
    pub async fn delete_all_users(&self) -> Result<u64> {
        let deleted = self.repo.delete_all_users().await?;
        info!(deleted, "All users deleted");
        Ok(deleted)
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.repo.list_users().await
    }

    /// Add a feed owned by `owner`, who automatically follows it.
    ///
    /// If the follow cannot be created the feed is deleted again, so a
    /// failed call leaves no feed behind and can be retried.
    pub async fn create_feed(&self, owner: &User, name: &str, url: &str) -> Result<(Feed, FeedFollow)> {
        let feed = self
            .repo
            .create_feed(&NewFeed::new(name, url, owner.id))
            .await?;

        let follow = match self.repo.create_feed_follow(owner.id, feed.id).await {
            Ok(follow) => follow,
            Err(e) => {
                if let Err(cleanup) = self.repo.delete_feed(feed.id).await {
                    warn!(feed = %feed.name, error = %cleanup, "Failed to remove unfollowed feed");
                }
                return Err(e);
            }
        };

        info!(feed = %feed.name, url = %feed.url, owner = %owner.name, "Feed created");
        Ok((feed, follow))
    }

    /// List all feeds with their owners' names.
    ///
    /// A failed owner lookup leaves that row's owner unset instead of
    /// failing the listing.
    pub async fn list_feeds(&self) -> Result<Vec<FeedWithOwner>> {
        let feeds = self.repo.list_feeds().await?;
        let mut listing = Vec::with_capacity(feeds.len());

        for feed in feeds {
            let owner_name = match self.repo.get_user_by_id(feed.user_id).await {
                Ok(Some(owner)) => Some(owner.name),
                Ok(None) => {
                    warn!(feed = %feed.name, owner = %feed.user_id, "Feed owner not found");
                    None
                }
                Err(e) => {
                    warn!(feed = %feed.name, error = %e, "Feed owner lookup failed");
                    None
                }
            };
            listing.push(FeedWithOwner { feed, owner_name });
        }

        Ok(listing)
    }

    /// Follow the feed registered under `url`.
    pub async fn follow_by_url(&self, user: &User, url: &str) -> Result<FeedFollow> {
        let feeds = self.repo.list_feeds().await?;
        let feed = find_feed_by_url(&feeds, url)?;

        let follow = self.repo.create_feed_follow(user.id, feed.id).await?;
        info!(user = %user.name, feed = %feed.name, "Feed followed");
        Ok(follow)
    }

    /// List the follows of the named user.
    pub async fn list_follows(&self, user_name: &str) -> Result<Vec<FeedFollow>> {
        self.repo.list_feed_follows_for_user(user_name).await
    }

    /// Stop following the feed registered under `url`.
    ///
    /// Returns the unfollowed feed.
    pub async fn unfollow_by_url(&self, user: &User, url: &str) -> Result<Feed> {
        let feeds = self.repo.list_feeds().await?;
        let feed = find_feed_by_url(&feeds, url)?.clone();

        if !self.repo.delete_feed_follow(user.id, feed.id).await? {
            return Err(GatorError::NotFound(format!(
                "follow of {} by {}",
                feed.name, user.name
            )));
        }
        info!(user = %user.name, feed = %feed.name, "Feed unfollowed");
        Ok(feed)
    }
}
