//! Gator - a command-line RSS aggregator.
//!
//! Users register, add and follow feeds, and fetch them from the command
//! line. State lives in a SQLite database; the logged-in user is kept in
//! the configuration file.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod rss;
pub mod subscription;

pub use commands::{register_commands, Command, Commands, State};
pub use config::Config;
pub use db::{Database, Repository, SqliteRepository, User};
pub use error::{FetchError, GatorError, Result};
pub use rss::{FeedFetcher, RssFeed, RssItem};
pub use subscription::{Feed, FeedFollow, FeedWithOwner, SubscriptionService};
