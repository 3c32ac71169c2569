//! Error types for Gator.

use thiserror::Error;

/// Errors produced while fetching and parsing a remote feed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL is not an absolute http(s) URL.
    #[error("invalid feed URL: {0}")]
    InvalidUrl(String),

    /// Transport failure (DNS, connection refused, body read).
    #[error("failed to fetch feed: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a status code of 300 or above.
    #[error("status code {0} returned from server")]
    BadStatus(u16),

    /// The body is not a well-formed feed document.
    #[error("failed to parse feed: {0}")]
    Parse(#[source] feed_rs::parser::ParseFeedError),
}

/// Common error type for Gator.
#[derive(Error, Debug)]
pub enum GatorError {
    /// Missing or malformed command arguments.
    #[error("{0}")]
    Validation(String),

    /// A user with this name already exists.
    #[error("user {0} already exists")]
    DuplicateName(String),

    /// A feed with this URL already exists.
    #[error("feed with url {0} already exists")]
    DuplicateFeed(String),

    /// The user already follows the feed.
    #[error("{user} already follows {feed}")]
    DuplicateFollow { user: String, feed: String },

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed fetch error.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// No handler is registered under the command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Database error.
    ///
    /// Errors from sqlx are converted automatically, except unique
    /// violations which the repository maps to the duplicate variants.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for GatorError {
    fn from(e: sqlx::Error) -> Self {
        GatorError::Database(e.to_string())
    }
}

/// Returns true if the sqlx error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Returns true if the sqlx error is a FOREIGN KEY constraint violation.
pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}

/// Result type alias for Gator operations.
pub type Result<T> = std::result::Result<T, GatorError>;
