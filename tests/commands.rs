//! Command-level integration tests.

mod common;

use common::TestEnv;
use gator::{Config, GatorError, Repository};

const TECH_URL: &str = "https://tech.example.com/feed.xml";
const NEWS_URL: &str = "https://news.example.com/rss";

#[tokio::test]
async fn test_register_login_addfeed_following() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    env.run_ok(&["login", "alice"]).await;
    env.run_ok(&["addfeed", "Tech", TECH_URL]).await;
    env.output.take();

    env.run_ok(&["following"]).await;
    assert_eq!(env.output.take(), "* Tech\n");

    let follows = env
        .db
        .repository()
        .list_feed_follows_for_user("alice")
        .await
        .unwrap();
    assert_eq!(follows.len(), 1);
    assert_eq!(follows[0].feed_name, "Tech");
}

#[tokio::test]
async fn test_session_persisted_to_config_file() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    env.run_ok(&["register", "bob"]).await;
    env.run_ok(&["login", "alice"]).await;

    let reloaded = Config::load(&env.config_path).unwrap();
    assert_eq!(reloaded.current_user_name.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_register_duplicate_name() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    let result = env.run(&["register", "alice"]).await;
    assert!(matches!(result, Err(GatorError::DuplicateName(name)) if name == "alice"));

    let users = env.db.repository().list_users().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_follow_unknown_url() {
    let mut env = TestEnv::new().await;
    env.run_ok(&["register", "alice"]).await;

    let result = env
        .run(&["follow", "https://nonexistent.example/feed.xml"])
        .await;
    assert!(matches!(result, Err(GatorError::NotFound(_))));

    let follows = env
        .db
        .repository()
        .list_feed_follows_for_user("alice")
        .await
        .unwrap();
    assert!(follows.is_empty());
}

#[tokio::test]
async fn test_follow_feed_of_other_user() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    env.run_ok(&["addfeed", "Tech", TECH_URL]).await;
    env.run_ok(&["register", "bob"]).await;
    env.output.take();

    env.run_ok(&["follow", TECH_URL]).await;
    assert_eq!(env.output.take(), "bob now follows Tech\n");

    let result = env.run(&["follow", TECH_URL]).await;
    assert!(matches!(result, Err(GatorError::DuplicateFollow { .. })));
}

#[tokio::test]
async fn test_addfeed_duplicate_url() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    env.run_ok(&["addfeed", "Tech", TECH_URL]).await;
    let result = env.run(&["addfeed", "Tech again", TECH_URL]).await;
    assert!(matches!(result, Err(GatorError::DuplicateFeed(_))));
}

#[tokio::test]
async fn test_unfollow() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    env.run_ok(&["addfeed", "Tech", TECH_URL]).await;
    env.run_ok(&["addfeed", "News", NEWS_URL]).await;
    env.run_ok(&["unfollow", TECH_URL]).await;
    env.output.take();

    env.run_ok(&["following"]).await;
    assert_eq!(env.output.take(), "* News\n");

    let result = env.run(&["unfollow", TECH_URL]).await;
    assert!(matches!(result, Err(GatorError::NotFound(_))));
}

#[tokio::test]
async fn test_logged_in_commands_require_session() {
    let mut env = TestEnv::new().await;

    for line in [
        &["addfeed", "Tech", TECH_URL][..],
        &["follow", TECH_URL][..],
        &["following"][..],
        &["unfollow", TECH_URL][..],
    ] {
        let result = env.run(line).await;
        assert!(
            matches!(result, Err(GatorError::Validation(_))),
            "{line:?} should need a logged-in user"
        );
    }
    assert!(env.db.repository().list_feeds().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_feeds_lists_owners() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    env.run_ok(&["addfeed", "Tech", TECH_URL]).await;
    env.run_ok(&["register", "bob"]).await;
    env.run_ok(&["addfeed", "News", NEWS_URL]).await;
    env.output.take();

    env.run_ok(&["feeds"]).await;
    let output = env.output.take();
    let tech = output.find("* Tech").unwrap();
    let news = output.find("* News").unwrap();
    assert!(tech < news);
    assert!(output.contains("Owner: alice"));
    assert!(output.contains("Owner: bob"));
}

#[tokio::test]
async fn test_users_marks_current() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "carol"]).await;
    env.run_ok(&["register", "alice"]).await;
    env.output.take();

    env.run_ok(&["users"]).await;
    assert_eq!(env.output.take(), "* alice (current)\n* carol\n");
}

#[tokio::test]
async fn test_reset_empties_users() {
    let mut env = TestEnv::new().await;

    env.run_ok(&["register", "alice"]).await;
    env.run_ok(&["addfeed", "Tech", TECH_URL]).await;
    env.run_ok(&["register", "bob"]).await;
    env.run_ok(&["reset"]).await;

    let repo = env.db.repository();
    assert!(repo.list_users().await.unwrap().is_empty());
    assert!(repo.list_feeds().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_command() {
    let mut env = TestEnv::new().await;

    let result = env.run(&["frobnicate", "now"]).await;
    let err = result.unwrap_err();
    assert!(matches!(err, GatorError::UnknownCommand(_)));
    assert_eq!(err.to_string(), "unknown command: frobnicate");
    assert!(env.output.contents().is_empty());
}

#[tokio::test]
async fn test_missing_arguments() {
    let mut env = TestEnv::new().await;

    let result = env.run(&["login"]).await;
    assert!(matches!(result, Err(GatorError::Validation(msg)) if msg == "usage: login <name>"));

    env.run_ok(&["register", "alice"]).await;
    let result = env.run(&["addfeed", "Tech"]).await;
    assert!(matches!(result, Err(GatorError::Validation(msg)) if msg == "usage: addfeed <name> <url>"));
}
