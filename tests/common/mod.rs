//! Test helpers for command-level integration tests.
//!
//! Provides `TestEnv`, a full command stack over a temporary database and
//! config file, and a local feed server.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::http::header;
use axum::routing::get;
use axum::Router;
use tempfile::TempDir;

use gator::config::FetchConfig;
use gator::{register_commands, Command, Commands, Config, Database, FeedFetcher, State};

/// RSS document served at `/feed.xml` by `spawn_feed_server`.
pub const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Boot.dev Blog</title>
    <link>https://blog.example.com/</link>
    <description>Learn &amp;amp; build</description>
    <item>
      <title>Why &amp;quot;Rust&amp;quot;?</title>
      <link>https://blog.example.com/why-rust</link>
      <description>Ownership &amp;amp; borrowing</description>
      <pubDate>Tue, 07 Jan 2025 09:30:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

/// Command output captured in memory.
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Return and clear the captured output.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock().unwrap());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A command stack over a temporary SQLite file and config file.
pub struct TestEnv {
    pub state: State,
    pub commands: Commands,
    pub output: SharedOutput,
    pub config_path: PathBuf,
    pub db: Database,
    _dir: TempDir,
}

impl TestEnv {
    /// Create a fresh environment with all commands registered.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_url = format!("sqlite://{}", dir.path().join("gator.db").display());
        let db = Database::open(&db_url).await.unwrap();

        let config_path = dir.path().join("gatorconfig.toml");
        let config = Config::default().with_path(&config_path);
        let fetcher = FeedFetcher::new(&FetchConfig {
            timeout_secs: Some(5),
            ..FetchConfig::default()
        })
        .unwrap();

        let output = SharedOutput::default();
        let state = State::with_output(
            Arc::new(db.repository()),
            config,
            fetcher,
            Box::new(output.clone()),
        );

        Self {
            state,
            commands: register_commands(),
            output,
            config_path,
            db,
            _dir: dir,
        }
    }

    /// Run a command line such as `["addfeed", "Tech", url]`.
    pub async fn run(&mut self, line: &[&str]) -> gator::Result<()> {
        let cmd = Command::from_args(line.iter().copied())?;
        self.commands.run(&mut self.state, &cmd).await
    }

    /// Run a command line, panicking on failure.
    pub async fn run_ok(&mut self, line: &[&str]) {
        if let Err(e) = self.run(line).await {
            panic!("command {line:?} failed: {e}");
        }
    }
}

/// Start a feed server on an ephemeral port.
///
/// Serves `SAMPLE_RSS` at `/feed.xml`; every other path is a 404.
pub async fn spawn_feed_server() -> SocketAddr {
    let app = Router::new().route(
        "/feed.xml",
        get(|| async { ([(header::CONTENT_TYPE, "application/rss+xml")], SAMPLE_RSS) }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
