//! SQLite repository for Gator.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::traits::Repository;
use super::user::User;
use super::{format_datetime, parse_datetime, parse_id, DbPool};
use crate::error::{is_foreign_key_violation, is_unique_violation};
use crate::subscription::{Feed, FeedFollow, NewFeed};
use crate::{GatorError, Result};

/// Follow columns joined with the follower's and feed's names.
const FEED_FOLLOW_SELECT: &str = r#"
    SELECT ff.id, ff.user_id, ff.feed_id, ff.created_at, ff.updated_at,
           u.name AS user_name, f.name AS feed_name
    FROM feed_follows ff
    JOIN users u ON u.id = ff.user_id
    JOIN feeds f ON f.id = ff.feed_id
"#;

/// Row type for users.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = GatorError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_id(&row.id)?,
            name: row.name,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        })
    }
}

/// Row type for feeds.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedRow {
    id: String,
    name: String,
    url: String,
    user_id: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<FeedRow> for Feed {
    type Error = GatorError;

    fn try_from(row: FeedRow) -> Result<Self> {
        Ok(Feed {
            id: parse_id(&row.id)?,
            name: row.name,
            url: row.url,
            user_id: parse_id(&row.user_id)?,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        })
    }
}

/// Row type for follows with joined names.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedFollowRow {
    id: String,
    user_id: String,
    feed_id: String,
    created_at: String,
    updated_at: String,
    user_name: String,
    feed_name: String,
}

impl TryFrom<FeedFollowRow> for FeedFollow {
    type Error = GatorError;

    fn try_from(row: FeedFollowRow) -> Result<Self> {
        Ok(FeedFollow {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            feed_id: parse_id(&row.feed_id)?,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
            user_name: row.user_name,
            feed_name: row.feed_name,
        })
    }
}

/// Repository backed by a SQLite pool.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn get_feed_by_id(&self, id: Uuid) -> Result<Option<Feed>> {
        let row = sqlx::query_as::<_, FeedRow>(
            "SELECT id, name, url, user_id, created_at, updated_at FROM feeds WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Feed::try_from).transpose()
    }

    async fn get_feed_follow(&self, id: Uuid) -> Result<Option<FeedFollow>> {
        let query = format!("{FEED_FOLLOW_SELECT} WHERE ff.id = ?");
        let row = sqlx::query_as::<_, FeedFollowRow>(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(FeedFollow::try_from).transpose()
    }

    /// Names of a user and a feed, falling back to their IDs.
    async fn follow_names(&self, user_id: Uuid, feed_id: Uuid) -> Result<(String, String)> {
        let names = sqlx::query_as::<_, (String, String)>(
            "SELECT u.name, f.name FROM users u, feeds f WHERE u.id = ? AND f.id = ?",
        )
        .bind(user_id.to_string())
        .bind(feed_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(names.unwrap_or_else(|| (user_id.to_string(), feed_id.to_string())))
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn create_user(&self, name: &str) -> Result<User> {
        let user = User::new(name);

        let result = sqlx::query(
            "INSERT INTO users (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(GatorError::DuplicateName(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        self.get_user_by_id(user.id)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("user {name}")))
    }

    async fn get_user(&self, name: &str) -> Result<Option<User>> {
        debug!(user = name, "Looking up user");
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn delete_all_users(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn create_feed(&self, feed: &NewFeed) -> Result<Feed> {
        let id = Uuid::new_v4();
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(
            r#"
            INSERT INTO feeds (id, name, url, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&feed.name)
        .bind(&feed.url)
        .bind(feed.user_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(GatorError::DuplicateFeed(feed.url.clone()))
            }
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(GatorError::NotFound(format!("user {}", feed.user_id)))
            }
            Err(e) => return Err(e.into()),
        }

        self.get_feed_by_id(id)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("feed {}", feed.name)))
    }

    async fn delete_feed(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>> {
        let rows = sqlx::query_as::<_, FeedRow>(
            "SELECT id, name, url, user_id, created_at, updated_at FROM feeds ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Feed::try_from).collect()
    }

    async fn create_feed_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<FeedFollow> {
        let id = Uuid::new_v4();
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(
            r#"
            INSERT INTO feed_follows (id, user_id, feed_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(feed_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                let (user, feed) = self.follow_names(user_id, feed_id).await?;
                return Err(GatorError::DuplicateFollow { user, feed });
            }
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(GatorError::NotFound("user or feed".to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        self.get_feed_follow(id)
            .await?
            .ok_or_else(|| GatorError::NotFound("feed follow".to_string()))
    }

    async fn list_feed_follows_for_user(&self, name: &str) -> Result<Vec<FeedFollow>> {
        let query = format!("{FEED_FOLLOW_SELECT} WHERE u.name = ? ORDER BY ff.rowid");
        let rows = sqlx::query_as::<_, FeedFollowRow>(&query)
            .bind(name)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(FeedFollow::try_from).collect()
    }

    async fn delete_feed_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feed_follows WHERE user_id = ? AND feed_id = ?")
            .bind(user_id.to_string())
            .bind(feed_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
