//! Command handlers.

use std::io::Write;

use crate::commands::{Command, State};
use crate::db::User;
use crate::rss::RssFeed;
use crate::subscription::SubscriptionService;
use crate::Result;

/// `login <name>`: switch the session to an existing user.
pub async fn login(state: &mut State, cmd: &Command) -> Result<()> {
    let name = cmd.arg(0, "login <name>")?;
    let repo = state.repo();
    let user = SubscriptionService::new(repo.as_ref())
        .get_user(name)
        .await?;

    state.config.set_user(&user.name)?;
    writeln!(state.out(), "User switched to {}", user.name)?;
    Ok(())
}

/// `register <name>`: create a user and log in as them.
pub async fn register(state: &mut State, cmd: &Command) -> Result<()> {
    let name = cmd.arg(0, "register <name>")?;
    let repo = state.repo();
    let user = SubscriptionService::new(repo.as_ref())
        .create_user(name)
        .await?;

    state.config.set_user(&user.name)?;
    let out = state.out();
    writeln!(out, "User created: {}", user.name)?;
    writeln!(out, " * ID:      {}", user.id)?;
    writeln!(out, " * Created: {}", user.created_at.to_rfc3339())?;
    Ok(())
}

/// `reset`: delete every user, their feeds and follows.
pub async fn reset(state: &mut State, _cmd: &Command) -> Result<()> {
    let repo = state.repo();
    let deleted = SubscriptionService::new(repo.as_ref())
        .delete_all_users()
        .await?;

    writeln!(state.out(), "Database reset, {deleted} users deleted")?;
    Ok(())
}

/// `users`: list users, marking the logged-in one.
pub async fn users(state: &mut State, _cmd: &Command) -> Result<()> {
    let repo = state.repo();
    let users = SubscriptionService::new(repo.as_ref())
        .list_users()
        .await?;

    let current = state.config.current_user_name.clone();
    let out = state.out();
    for user in users {
        if user.is_current(current.as_deref()) {
            writeln!(out, "* {} (current)", user.name)?;
        } else {
            writeln!(out, "* {}", user.name)?;
        }
    }
    Ok(())
}

/// `agg [url]`: fetch one feed and print it.
pub async fn agg(state: &mut State, cmd: &Command) -> Result<()> {
    let url = cmd
        .args
        .first()
        .cloned()
        .unwrap_or_else(|| state.config.fetch.default_feed_url.clone());

    let feed = state.fetcher.fetch(&url).await?;
    write_feed(state.out(), &feed)?;
    Ok(())
}

/// `addfeed <name> <url>`: create a feed owned and followed by `user`.
pub async fn add_feed(state: &mut State, cmd: &Command, user: User) -> Result<()> {
    let usage = "addfeed <name> <url>";
    let name = cmd.arg(0, usage)?;
    let url = cmd.arg(1, usage)?;

    let repo = state.repo();
    let (feed, follow) = SubscriptionService::new(repo.as_ref())
        .create_feed(&user, name, url)
        .await?;

    let out = state.out();
    writeln!(out, "Feed created: {}", feed.name)?;
    writeln!(out, " * ID:  {}", feed.id)?;
    writeln!(out, " * URL: {}", feed.url)?;
    writeln!(out, "{} now follows {}", follow.user_name, follow.feed_name)?;
    Ok(())
}

/// `feeds`: list every feed with its owner.
pub async fn feeds(state: &mut State, _cmd: &Command) -> Result<()> {
    let repo = state.repo();
    let feeds = SubscriptionService::new(repo.as_ref())
        .list_feeds()
        .await?;

    let out = state.out();
    if feeds.is_empty() {
        writeln!(out, "No feeds found")?;
        return Ok(());
    }
    for entry in &feeds {
        writeln!(out, "* {}", entry.feed.name)?;
        writeln!(out, "  URL:   {}", entry.feed.url)?;
        writeln!(out, "  Owner: {}", entry.owner_display())?;
    }
    Ok(())
}

/// `follow <url>`: follow an existing feed.
pub async fn follow(state: &mut State, cmd: &Command, user: User) -> Result<()> {
    let url = cmd.arg(0, "follow <url>")?;
    let repo = state.repo();
    let follow = SubscriptionService::new(repo.as_ref())
        .follow_by_url(&user, url)
        .await?;

    writeln!(state.out(), "{} now follows {}", follow.user_name, follow.feed_name)?;
    Ok(())
}

/// `following`: list the feeds `user` follows.
pub async fn following(state: &mut State, _cmd: &Command, user: User) -> Result<()> {
    let repo = state.repo();
    let follows = SubscriptionService::new(repo.as_ref())
        .list_follows(&user.name)
        .await?;

    let out = state.out();
    if follows.is_empty() {
        writeln!(out, "{} is not following any feeds", user.name)?;
        return Ok(());
    }
    for follow in &follows {
        writeln!(out, "* {}", follow.feed_name)?;
    }
    Ok(())
}

/// `unfollow <url>`: stop following a feed.
pub async fn unfollow(state: &mut State, cmd: &Command, user: User) -> Result<()> {
    let url = cmd.arg(0, "unfollow <url>")?;
    let repo = state.repo();
    let feed = SubscriptionService::new(repo.as_ref())
        .unfollow_by_url(&user, url)
        .await?;

    writeln!(state.out(), "{} unfollowed {}", user.name, feed.name)?;
    Ok(())
}

fn write_feed(out: &mut dyn Write, feed: &RssFeed) -> std::io::Result<()> {
    writeln!(out, "Feed: {}", feed.title)?;
    if !feed.link.is_empty() {
        writeln!(out, "Link: {}", feed.link)?;
    }
    if !feed.description.is_empty() {
        writeln!(out, "Description: {}", feed.description)?;
    }
    for item in &feed.items {
        writeln!(out)?;
        writeln!(out, "* {}", item.title)?;
        if !item.link.is_empty() {
            writeln!(out, "  {}", item.link)?;
        }
        match (item.published_at, item.pub_date.as_deref()) {
            (Some(date), _) => writeln!(out, "  Published: {}", date.format("%Y-%m-%d %H:%M"))?,
            (None, Some(raw)) => writeln!(out, "  Published: {raw}")?,
            (None, None) => {}
        }
        if !item.description.is_empty() {
            writeln!(out, "  {}", item.description)?;
        }
    }
    Ok(())
}
