//! User model for Gator.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: Uuid,
    /// Login name (unique).
    pub name: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh user record with a new ID.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether this user is the one named in the session.
    pub fn is_current(&self, current_user_name: Option<&str>) -> bool {
        current_user_name == Some(self.name.as_str())
    }
}
